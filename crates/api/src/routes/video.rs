//! Route definitions for recorded video clips.
//!
//! Mounted at `/video`.
//!
//! ```text
//! GET /{resource_id}/{stream_id}/{part_id}?rt=     stream_clip
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{resource_id}/{stream_id}/{part_id}",
        get(video::stream_clip),
    )
}
