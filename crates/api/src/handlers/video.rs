//! Handler for the `/video` resource.
//!
//! Clips are forwarded chunk by chunk as teleport.io delivers them; the
//! proxy never holds a whole clip in memory.

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use teleport_client::VideoClip;
use teleport_core::time::parse_wire_timestamp;

use crate::error::{AppError, AppResult};
use crate::query::VideoParams;
use crate::state::AppState;

/// GET /video/{resource_id}/{stream_id}/{part_id}?rt=
pub async fn stream_clip(
    State(state): State<AppState>,
    Path((resource_id, stream_id, part_id)): Path<(String, String, String)>,
    params: Result<Query<VideoParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let clip = VideoClip {
        feed_id: state.config.feed_id.clone(),
        video_resource_id: resource_id,
        video_stream_id: stream_id,
        video_part_id: part_id,
        timestamp: parse_wire_timestamp(&params.rt)?,
    };

    tracing::info!(
        feed_id = %clip.feed_id,
        part_id = %clip.video_part_id,
        rt = %clip.timestamp,
        "Streaming video clip",
    );

    let stream = state.teleport.stream_video(&clip).await?;
    let content_length = stream.content_length();

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "video/mp4")],
        Body::from_stream(stream.into_stream()),
    )
        .into_response();

    if let Some(len) = content_length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, len.into());
    }

    Ok(response)
}
