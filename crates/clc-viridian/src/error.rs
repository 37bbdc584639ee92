//! Control-plane client errors.

use thiserror::Error;

/// Errors returned by the control-plane client.
///
/// Network failures ([`Error::Request`], [`Error::ReadBody`]) are kept apart
/// from HTTP failures ([`Error::Status`]) and from payload failures
/// ([`Error::Encode`], [`Error::Decode`]).
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be built or sent.
    #[error("sending request: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("reading response: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// The server answered with a status other than 200.
    #[error("{status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request body could not be serialized.
    #[error("encoding request: {0}")]
    Encode(#[source] serde_json::Error),

    /// A 200 response body did not match the expected shape.
    #[error("decoding response: {0}")]
    Decode(#[source] serde_json::Error),

    /// No cluster matched the given name or id.
    #[error("cluster not found: {0}")]
    ClusterNotFound(String),
}

impl Error {
    /// HTTP status code, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened below HTTP.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Request(_) | Self::ReadBody(_))
    }
}

/// Result type alias for control-plane operations.
pub type Result<T> = std::result::Result<T, Error>;
