/// Errors from the teleport.io client.
///
/// Every failure of a network operation is one of these variants. Nothing
/// is retried internally; the caller decides what to do.
#[derive(Debug, thiserror::Error)]
pub enum TeleportError {
    /// The feed identifier is unknown to teleport.io.
    #[error("Feed not found: {feed_id}")]
    FeedNotFound { feed_id: String },

    /// The feed exists but has no image or video at the requested point.
    #[error("Frame not available: {resource}")]
    FrameNotAvailable {
        /// Identifies what was requested, e.g. `feed at 2025-11-26T21:12:00+00:00`.
        resource: String,
    },

    /// Transport-level failure: DNS, TLS, connection reset, timeout.
    #[error("{message}: {source}")]
    Connection {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// teleport.io answered with a non-2xx status not covered above.
    #[error("teleport.io API error ({status}) for {url}")]
    Http { status: u16, url: String },

    /// A successful response whose body is not in the documented shape.
    #[error("Invalid response from teleport.io: {0}")]
    InvalidResponse(String),
}

impl TeleportError {
    pub(crate) fn connection(source: reqwest::Error) -> Self {
        Self::Connection {
            message: "Failed to connect to teleport.io".to_string(),
            source,
        }
    }

    /// Whether this is a transport failure caused by a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Connection { source, .. } if source.is_timeout())
    }
}
