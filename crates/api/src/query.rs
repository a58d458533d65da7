//! Query parameter types for the image and video handlers.

use serde::Deserialize;
use teleport_client::ImageSize;

/// `?size=large|small` for `/image/current`.
#[derive(Debug, Default, Deserialize)]
pub struct SizeParams {
    pub size: Option<ImageSize>,
}

/// Parameters for `/image/at`.
///
/// `hour` and `minute` are local wall-clock time in the configured
/// zone. Without `date`, the most recent occurrence is used.
#[derive(Debug, Deserialize)]
pub struct ImageAtParams {
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    pub size: Option<ImageSize>,
}

/// Parameters for the fixed-time shortcuts (`/image/8am`, `/image/noon`).
#[derive(Debug, Default, Deserialize)]
pub struct ShortcutParams {
    pub date: Option<String>,
    pub size: Option<ImageSize>,
}

/// `?rt=` for `/video/...`: the clip timestamp as teleport.io prints it.
#[derive(Debug, Deserialize)]
pub struct VideoParams {
    pub rt: String,
}
