//! Incremental download of a video clip.

use bytes::Bytes;
use futures::{Stream, TryStreamExt};

use crate::error::TeleportError;

/// A video response body that has not been read yet.
///
/// The bytes are pulled from the network only as the caller asks for
/// them, so nothing is buffered beyond the current chunk. The stream is
/// single-pass: once drained it cannot be restarted. Dropping it closes
/// the underlying HTTP response.
#[derive(Debug)]
pub struct VideoStream {
    response: reqwest::Response,
}

impl VideoStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self { response }
    }

    /// Total size announced by the server, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Read the next chunk, or `None` once the clip is complete.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, TeleportError> {
        self.response
            .chunk()
            .await
            .map_err(TeleportError::connection)
    }

    /// Convert into a [`Stream`] of chunks, e.g. to forward as an HTTP body.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, TeleportError>> + Send + 'static {
        self.response
            .bytes_stream()
            .map_err(TeleportError::connection)
    }
}
