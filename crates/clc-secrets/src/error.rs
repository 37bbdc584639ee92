//! Error types for the secret store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while saving or reading secrets.
#[derive(Debug, Error)]
pub enum Error {
    /// Namespace or name cannot be used as a path component.
    #[error("invalid secret key: {reason}")]
    InvalidKey {
        /// Why the key was rejected.
        reason: String,
    },

    /// No record exists for the key.
    #[error("secret not found: {namespace}/{name}")]
    NotFound {
        /// Record namespace.
        namespace: String,
        /// Record name.
        name: String,
    },

    /// Creating the namespace directory failed.
    #[error("creating secrets directory {}: {source}", path.display())]
    CreateDir {
        /// Directory being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the record failed.
    #[error("writing the secret {}: {source}", path.display())]
    Write {
        /// Record path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading the record failed.
    #[error("reading the secret {}: {source}", path.display())]
    Read {
        /// Record path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The record is not valid base64.
    #[error("decoding the secret {}: {source}", path.display())]
    Decode {
        /// Record path.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: base64::DecodeError,
    },

    /// The caller's scope was canceled before storage was touched.
    #[error("secret save canceled")]
    Canceled,
}

impl Error {
    /// Whether the record simply does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for secret store operations.
pub type Result<T> = std::result::Result<T, Error>;
