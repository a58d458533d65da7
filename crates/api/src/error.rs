use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use teleport_client::TeleportError;
use teleport_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for input validation and [`TeleportError`] for
/// upstream failures. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `teleport_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure talking to teleport.io.
    #[error(transparent)]
    Teleport(#[from] TeleportError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Teleport(err) => classify_teleport_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an upstream error into an HTTP status, error code, and message.
///
/// - `FrameNotAvailable` maps to 404.
/// - Transport timeouts map to 504.
/// - Everything else is a gateway failure (502) with a sanitized message.
fn classify_teleport_error(err: &TeleportError) -> (StatusCode, &'static str, String) {
    match err {
        TeleportError::FrameNotAvailable { resource } => (
            StatusCode::NOT_FOUND,
            "FRAME_NOT_AVAILABLE",
            format!("No image available for {resource}"),
        ),
        err if err.is_timeout() => {
            tracing::error!(error = %err, "teleport.io timed out");
            (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                "teleport.io did not respond in time".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "teleport.io error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "teleport.io request failed".to_string(),
            )
        }
    }
}
