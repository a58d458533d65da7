//! HTTP client for the teleport.io v2 API.
//!
//! [`TeleportClient`] holds the configuration (hosts, timeouts, default
//! image size). Call [`TeleportClient::connect`] to acquire a pooled
//! [`TeleportConnection`]; every network operation lives on the
//! connection, and the pool is released when the connection is dropped.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{RequestBuilder, Response, StatusCode};
use teleport_core::time::{format_frame_time, format_millis_time, parse_wire_timestamp};
use teleport_core::types::Timestamp;

use crate::error::TeleportError;
use crate::models::{
    Feed, Frame, FrameQueryResponse, FrameQueryResult, ImageSize, VideoClip, DEFAULT_API_URL,
    DEFAULT_VIDEO_URL,
};
use crate::stream::VideoStream;

const FRAME_GET: &str = "/api/v2/frame-get";
const FRAME_QUERY: &str = "/api/v2/frame-query";
const VIDEO_GET: &str = "/api/v2/video-get";

/// Default timeout for image and query requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for video requests. Recorded clips download slowly.
pub const DEFAULT_VIDEO_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration handle for teleport.io.
///
/// Cheap to clone and holds no network resources. Create a
/// [`TeleportConnection`] by calling [`connect`](Self::connect).
#[derive(Debug, Clone)]
pub struct TeleportClient {
    api_url: String,
    video_url: String,
    timeout: Duration,
    video_timeout: Duration,
    default_size: ImageSize,
}

impl Default for TeleportClient {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            video_url: DEFAULT_VIDEO_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            video_timeout: DEFAULT_VIDEO_TIMEOUT,
            default_size: ImageSize::default(),
        }
    }
}

impl TeleportClient {
    /// Client targeting the public teleport.io hosts with default timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose image endpoints live at the feed's base URL.
    pub fn for_feed(feed: &Feed) -> Self {
        Self::default().with_api_url(&feed.base_url)
    }

    /// Override the image API host, e.g. `http://127.0.0.1:8080`.
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Override the video host.
    pub fn with_video_url(mut self, url: &str) -> Self {
        self.video_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_video_timeout(mut self, timeout: Duration) -> Self {
        self.video_timeout = timeout;
        self
    }

    pub fn with_default_size(mut self, size: ImageSize) -> Self {
        self.default_size = size;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn video_timeout(&self) -> Duration {
        self.video_timeout
    }

    pub fn default_size(&self) -> ImageSize {
        self.default_size
    }

    /// Acquire a pooled HTTP connection.
    ///
    /// Fails only if the HTTP client cannot be constructed (e.g. the TLS
    /// backend fails to initialize).
    pub fn connect(&self) -> Result<TeleportConnection, TeleportError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TeleportError::connection)?;

        tracing::debug!(
            api_url = %self.api_url,
            video_url = %self.video_url,
            timeout_secs = self.timeout.as_secs(),
            "Opened teleport.io connection pool",
        );

        Ok(TeleportConnection {
            http,
            api_url: self.api_url.clone(),
            video_url: self.video_url.clone(),
            video_timeout: self.video_timeout,
            default_size: self.default_size,
        })
    }
}

/// A live, pooled connection to teleport.io.
///
/// Safe to share between tasks (`Arc<TeleportConnection>`); concurrent
/// calls reuse pooled sockets. Each operation issues exactly one request
/// and never retries.
#[derive(Debug)]
pub struct TeleportConnection {
    http: reqwest::Client,
    api_url: String,
    video_url: String,
    video_timeout: Duration,
    default_size: ImageSize,
}

impl TeleportConnection {
    /// Fetch the live image of a feed as raw JPEG bytes.
    pub async fn get_current_image(
        &self,
        feed_id: &str,
        size: Option<ImageSize>,
    ) -> Result<Bytes, TeleportError> {
        let size = size.unwrap_or(self.default_size);
        let request = self
            .http
            .get(format!("{}{FRAME_GET}", self.api_url))
            .query(&[("feedid", feed_id), ("sizecode", size.code())]);

        let response = Self::fetch(request, FRAME_GET, feed_id, || {
            TeleportError::FeedNotFound {
                feed_id: feed_id.to_string(),
            }
        })
        .await?;

        Self::read_bytes(response).await
    }

    /// Fetch the image a feed captured at `at` (UTC).
    pub async fn get_image_at(
        &self,
        feed_id: &str,
        at: &Timestamp,
        size: Option<ImageSize>,
    ) -> Result<Bytes, TeleportError> {
        let size = size.unwrap_or(self.default_size);
        let frametime = format_frame_time(at);
        let request = self.http.get(format!("{}{FRAME_GET}", self.api_url)).query(&[
            ("feedid", feed_id),
            ("sizecode", size.code()),
            ("frametime", frametime.as_str()),
        ]);

        let response = Self::fetch(request, FRAME_GET, feed_id, || {
            TeleportError::FrameNotAvailable {
                resource: format!("{feed_id} at {}", at.to_rfc3339()),
            }
        })
        .await?;

        Self::read_bytes(response).await
    }

    /// List the frames available for a feed between `start` and `end`,
    /// one per `interval_secs`.
    ///
    /// A response without frames is an empty result, not an error.
    pub async fn get_frame_history(
        &self,
        feed_id: &str,
        start: &Timestamp,
        end: &Timestamp,
        interval_secs: u32,
    ) -> Result<FrameQueryResult, TeleportError> {
        let starttime = format_millis_time(start);
        let endtime = format_millis_time(end);
        let interval = interval_secs.to_string();
        let request = self.http.get(format!("{}{FRAME_QUERY}", self.api_url)).query(&[
            ("feedid", feed_id),
            ("starttime", starttime.as_str()),
            ("endtime", endtime.as_str()),
            ("mode", "pf"),
            ("interval", interval.as_str()),
        ]);

        let response = Self::fetch(request, FRAME_QUERY, feed_id, || {
            TeleportError::FeedNotFound {
                feed_id: feed_id.to_string(),
            }
        })
        .await?;

        let body = Self::read_bytes(response).await?;
        let parsed: FrameQueryResponse = serde_json::from_slice(&body)
            .map_err(|e| TeleportError::InvalidResponse(format!("frame-query body: {e}")))?;

        let frames = parsed
            .frames
            .unwrap_or_default()
            .iter()
            .map(|ts| {
                parse_wire_timestamp(ts)
                    .map(|timestamp| Frame {
                        timestamp,
                        feed_id: feed_id.to_string(),
                    })
                    .map_err(|e| TeleportError::InvalidResponse(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(feed_id, frame_count = frames.len(), "Frame history received");

        Ok(FrameQueryResult {
            feed_id: feed_id.to_string(),
            start_time: *start,
            end_time: *end,
            interval_seconds: interval_secs,
            frames,
        })
    }

    /// Fetch the image for a frame returned by [`get_frame_history`](Self::get_frame_history).
    pub async fn get_frame_image(
        &self,
        frame: &Frame,
        size: Option<ImageSize>,
    ) -> Result<Bytes, TeleportError> {
        self.get_image_at(&frame.feed_id, &frame.timestamp, size)
            .await
    }

    /// Download a whole video clip into memory.
    pub async fn get_video(&self, clip: &VideoClip) -> Result<Bytes, TeleportError> {
        let response = self.fetch_video(clip).await?;
        Self::read_bytes(response).await
    }

    /// Start downloading a video clip without buffering it.
    ///
    /// The returned [`VideoStream`] belongs to the caller, who reads it
    /// chunk by chunk and closes it by dropping it.
    pub async fn stream_video(&self, clip: &VideoClip) -> Result<VideoStream, TeleportError> {
        let response = self.fetch_video(clip).await?;
        Ok(VideoStream::new(response))
    }

    /// Release the connection pool.
    ///
    /// Dropping the connection has the same effect; this just makes the
    /// end of the scope explicit.
    pub fn close(self) {
        drop(self);
    }

    // ---- private helpers ----

    async fn fetch_video(&self, clip: &VideoClip) -> Result<Response, TeleportError> {
        let rt = format_millis_time(&clip.timestamp);
        let request = self
            .http
            .get(format!("{}{VIDEO_GET}", self.video_url))
            .timeout(self.video_timeout)
            .query(&[
                ("feedid", clip.feed_id.as_str()),
                ("videoresourceid", clip.video_resource_id.as_str()),
                ("videostreamid", clip.video_stream_id.as_str()),
                ("videopartid", clip.video_part_id.as_str()),
                ("rt", rt.as_str()),
            ]);

        Self::fetch(request, VIDEO_GET, &clip.feed_id, || {
            TeleportError::FrameNotAvailable {
                resource: format!("video part {}", clip.video_part_id),
            }
        })
        .await
    }

    /// Send a request and classify the response status.
    ///
    /// 404 becomes the caller's `not_found` error, any other non-2xx
    /// becomes [`TeleportError::Http`], and transport failures become
    /// [`TeleportError::Connection`].
    async fn fetch(
        request: RequestBuilder,
        endpoint: &'static str,
        feed_id: &str,
        not_found: impl FnOnce() -> TeleportError,
    ) -> Result<Response, TeleportError> {
        tracing::debug!(endpoint, feed_id, "Requesting teleport.io");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(endpoint, feed_id, error = %e, "teleport.io request failed");
            TeleportError::connection(e)
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(endpoint, feed_id, "teleport.io returned 404");
            return Err(not_found());
        }

        Self::ensure_success(response)
    }

    /// Ensure the response has a success status code.
    fn ensure_success(response: Response) -> Result<Response, TeleportError> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %response.url(), "teleport.io API error");
            return Err(TeleportError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    async fn read_bytes(response: Response) -> Result<Bytes, TeleportError> {
        response.bytes().await.map_err(TeleportError::connection)
    }
}

impl Drop for TeleportConnection {
    fn drop(&mut self) {
        tracing::debug!(api_url = %self.api_url, "Released teleport.io connection pool");
    }
}
