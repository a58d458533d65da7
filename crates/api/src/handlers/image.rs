//! Handlers for the `/image` resource.
//!
//! All routes answer with raw `image/jpeg` bytes from the configured
//! feed. Local times are interpreted in the configured timezone and
//! converted to UTC before calling teleport.io.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use teleport_client::ImageSize;
use teleport_core::time::{local_to_utc, parse_date, resolve_time_of_day};
use teleport_core::types::Timestamp;

use crate::error::{AppError, AppResult};
use crate::query::{ImageAtParams, ShortcutParams, SizeParams};
use crate::state::AppState;

const MORNING_HOUR: u32 = 8;
const NOON_HOUR: u32 = 12;

/// Work out which UTC instant a local `hour:minute` request refers to.
///
/// With an explicit `date` that day is used as-is. Without one, the most
/// recent occurrence relative to `now` wins, so an early-morning request
/// for noon returns yesterday's noon.
pub fn resolve_target(
    now: &DateTime<Tz>,
    hour: u32,
    minute: u32,
    date: Option<&str>,
) -> AppResult<Timestamp> {
    let target = match date {
        Some(date) => local_to_utc(&now.timezone(), parse_date(date)?, hour, minute)?,
        None => resolve_time_of_day(now, hour, minute)?,
    };
    Ok(target)
}

/// GET /image/current
pub async fn current_image(
    State(state): State<AppState>,
    params: Result<Query<SizeParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;

    tracing::info!(feed_id = %state.config.feed_id, "Fetching current image");
    let image = state
        .teleport
        .get_current_image(&state.config.feed_id, Some(params.size.unwrap_or_default()))
        .await?;

    Ok(jpeg(image))
}

/// GET /image/at?hour=&minute=&date=&size=
pub async fn image_at(
    State(state): State<AppState>,
    params: Result<Query<ImageAtParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;

    image_at_local(
        &state,
        params.hour,
        params.minute,
        params.date.as_deref(),
        params.size,
    )
    .await
}

/// GET /image/8am?date=&size=
pub async fn image_morning(
    State(state): State<AppState>,
    params: Result<Query<ShortcutParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    image_at_local(&state, MORNING_HOUR, 0, params.date.as_deref(), params.size).await
}

/// GET /image/noon?date=&size=
pub async fn image_noon(
    State(state): State<AppState>,
    params: Result<Query<ShortcutParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    image_at_local(&state, NOON_HOUR, 0, params.date.as_deref(), params.size).await
}

async fn image_at_local(
    state: &AppState,
    hour: u32,
    minute: u32,
    date: Option<&str>,
    size: Option<ImageSize>,
) -> AppResult<Response> {
    let now = Utc::now().with_timezone(&state.config.timezone);
    let target = resolve_target(&now, hour, minute, date)?;

    tracing::info!(
        feed_id = %state.config.feed_id,
        hour,
        minute,
        date = date.unwrap_or("latest"),
        target = %target,
        "Fetching image at local time",
    );

    let image = state
        .teleport
        .get_image_at(&state.config.feed_id, &target, Some(size.unwrap_or_default()))
        .await?;

    Ok(jpeg(image))
}

fn jpeg(image: impl IntoResponse) -> Response {
    ([(header::CONTENT_TYPE, "image/jpeg")], image).into_response()
}
