//! Value types exchanged with the teleport.io API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use teleport_core::types::Timestamp;

/// Default API host for image endpoints.
pub const DEFAULT_API_URL: &str = "https://www.teleport.io";

/// Default host serving recorded video.
pub const DEFAULT_VIDEO_URL: &str = "https://video.teleport.io";

/// Default `interval` for frame-history queries: one frame per day.
pub const DEFAULT_FRAME_INTERVAL_SECS: u32 = 86_400;

/// Image size codes accepted by `frame-get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// 768 px high (`x768`).
    #[default]
    Large,
    /// 480 px high (`x480`).
    Small,
}

impl ImageSize {
    /// The `sizecode` query value.
    pub fn code(self) -> &'static str {
        match self {
            Self::Large => "x768",
            Self::Small => "x480",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown size name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown image size '{0}', expected 'large' or 'small'")]
pub struct ParseImageSizeError(pub String);

impl FromStr for ImageSize {
    type Err = ParseImageSizeError;

    /// Accepts the friendly names (`large`, `small`) and the wire codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "large" | "x768" => Ok(Self::Large),
            "small" | "x480" => Ok(Self::Small),
            _ => Err(ParseImageSizeError(s.to_string())),
        }
    }
}

/// Configuration for a teleport.io feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub feed_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Feed {
    pub fn new(feed_id: impl Into<String>) -> Self {
        Self {
            feed_id: feed_id.into(),
            base_url: default_base_url(),
        }
    }
}

/// One historical snapshot of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp: Timestamp,
    pub feed_id: String,
}

/// Result of a frame-history query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameQueryResult {
    pub feed_id: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub interval_seconds: u32,
    /// In the order the service returned them (chronological).
    pub frames: Vec<Frame>,
}

/// An addressable segment of recorded video.
///
/// The three ids are opaque values assigned by teleport.io.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoClip {
    pub feed_id: String,
    pub video_resource_id: String,
    pub video_stream_id: String,
    pub video_part_id: String,
    pub timestamp: Timestamp,
}

/// Raw `frame-query` response body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FrameQueryResponse {
    #[serde(rename = "Frames", default)]
    pub frames: Option<Vec<String>>,
}
