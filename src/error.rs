//! Error types for client operations.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid endpoint URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A record body could not be serialized for the bulk stream.
    #[error("encoding error: {0}")]
    Encoding(#[source] serde_json::Error),

    /// A response body could not be decoded into the requested type.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Non-2xx response from the engine, surfaced verbatim.
    #[error("{status}: {body}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// Transport-level failure from the underlying HTTP client.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request signing failure.
    #[cfg(feature = "aws-auth")]
    #[error("request signing failed: {0}")]
    Signing(String),
}

impl Error {
    /// Get the HTTP status code if this is a response error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error carries an error response from the engine.
    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response { .. })
    }
}
