pub mod health;
pub mod image;
pub mod video;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the proxy route tree.
///
/// ```text
/// /image/current                  live image
/// /image/at                       image at local time
/// /image/8am                      8 AM shortcut
/// /image/noon                     noon shortcut
///
/// /video/{resource}/{stream}/{part}   streamed clip
/// ```
///
/// Each group gets a handler timeout longer than the matching upstream
/// timeout, so a slow teleport.io surfaces as a 504 from the client
/// rather than a 408 from the server. A handler timeout only bounds the
/// wait for response headers; the streamed body is not cut off.
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest(
            "/image",
            image::router().layer(request_timeout(config.request_timeout_secs)),
        )
        .nest(
            "/video",
            video::router().layer(request_timeout(config.video_request_timeout_secs())),
        )
}

fn request_timeout(secs: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(secs))
}
