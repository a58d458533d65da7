//! Async client for teleport.io webcam feeds.
//!
//! Fetches live and historical still images, lists the frames recorded
//! for a feed, and downloads or streams recorded video clips.
//!
//! ```ignore
//! let conn = TeleportClient::new().connect()?;
//! let jpeg = conn.get_current_image("fe5nsqhtejqi", None).await?;
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod stream;

pub use client::{TeleportClient, TeleportConnection};
pub use error::TeleportError;
pub use models::{Feed, Frame, FrameQueryResult, ImageSize, VideoClip};
pub use stream::VideoStream;
