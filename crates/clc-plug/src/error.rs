//! Errors surfaced by commands and the framework around them.

use std::fmt;

use clc_proto::ProtoError;
use thiserror::Error;

/// Why a cancel scope fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The user interrupted the invocation.
    Interrupted,
    /// The invocation's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupted => write!(f, "interrupted"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Errors returned by registration, declaration and command execution.
#[derive(Debug, Error)]
pub enum Error {
    /// A command was registered twice under the same path.
    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),

    /// A command path is empty or has an empty segment.
    #[error("invalid command path '{0}'")]
    InvalidPath(String),

    /// A command declared its flags or arguments inconsistently.
    #[error("invalid declaration for '{path}': {reason}")]
    Declaration {
        /// Path of the offending command.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The invocation was canceled before the work finished.
    #[error("canceled: {0}")]
    Canceled(CancelReason),

    /// A cluster invocation failed.
    #[error("invocation failed: {0}")]
    Invocation(String),

    /// The command needs a cluster connection and none is configured.
    #[error("not connected to a cluster")]
    NotConnected,

    /// No control-plane token is stored for the configured API key.
    #[error("not logged in; run 'viridian login' first")]
    NotLoggedIn,

    /// A cluster message or value could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtoError),

    /// A control-plane call failed.
    #[error(transparent)]
    Api(#[from] clc_viridian::Error),

    /// Secret storage failed.
    #[error("secret storage: {0}")]
    Secrets(#[from] clc_secrets::Error),

    /// A flag or argument value is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `execute_blocking` was called from inside another blocking scope.
    #[error("blocking scopes cannot be nested")]
    NestedBlocking,

    /// Invalid runtime configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error means the invocation was canceled.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(
            self,
            Self::Canceled(_) | Self::Secrets(clc_secrets::Error::Canceled)
        )
    }

    /// Shorthand for a declaration error.
    pub fn declaration(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Declaration {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for plugin operations.
pub type Result<T> = std::result::Result<T, Error>;
