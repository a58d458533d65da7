//! Route definitions for still images of the configured feed.
//!
//! Mounted at `/image`.
//!
//! ```text
//! GET /current      current_image   ?size=
//! GET /at           image_at        ?hour=&minute=&date=&size=
//! GET /8am          image_morning   ?date=&size=
//! GET /noon         image_noon      ?date=&size=
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::image;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/current", get(image::current_image))
        .route("/at", get(image::image_at))
        .route("/8am", get(image::image_morning))
        .route("/noon", get(image::image_noon))
}
