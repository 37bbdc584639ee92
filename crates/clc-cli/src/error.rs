//! CLI error types.

use std::fmt;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Command registration or declaration failed.
    Startup(clc_plug::Error),
    /// The command ran and failed.
    Command(clc_plug::Error),
    /// The command line could not be parsed.
    Usage(clap::Error),
    /// Invalid configuration.
    Config(String),
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl CliError {
    /// Whether the failure was a cancellation.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Command(e) if e.is_canceled())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup(e) => write!(f, "startup failed: {e}"),
            Self::Command(e) => write!(f, "{e}"),
            Self::Usage(e) => write!(f, "{e}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Startup(e) | Self::Command(e) => Some(e),
            Self::Usage(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Config(_) | Self::Format(_) => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        Self::Usage(err)
    }
}

impl From<clc_plug::Error> for CliError {
    fn from(err: clc_plug::Error) -> Self {
        Self::Command(err)
    }
}
