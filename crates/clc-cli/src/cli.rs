//! Global flags shared by every command.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};
use clc_viridian::ApiConfig;
use clc_viridian::config::{
    DEFAULT_API_BASE_URL, DEFAULT_API_CLASS, ENV_API_BASE_URL, ENV_API_CLASS, ENV_API_KEY,
    ENV_API_SECRET,
};

/// Overrides the configuration home directory.
pub const ENV_HOME: &str = "CLC_HOME";

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table.
    #[default]
    Table,
    /// JSON array of objects.
    Json,
    /// Tab-separated values, no header.
    Delimited,
}

/// Flags accepted before or after any command path.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Show more detail and debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide the progress display.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Give up after this many seconds.
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Configuration home (default: ~/.hazelcast).
    #[arg(long, env = ENV_HOME, global = true)]
    pub home: Option<PathBuf>,

    /// Viridian API base URL.
    #[arg(long, env = ENV_API_BASE_URL, global = true)]
    pub api_base: Option<String>,

    /// Viridian API key.
    #[arg(long, env = ENV_API_KEY, global = true)]
    pub api_key: Option<String>,

    /// Viridian API secret.
    #[arg(long, env = ENV_API_SECRET, hide_env_values = true, global = true)]
    pub api_secret: Option<String>,

    /// Viridian API class.
    #[arg(long, env = ENV_API_CLASS, global = true)]
    pub api_class: Option<String>,
}

impl GlobalArgs {
    /// The configuration home directory.
    #[must_use]
    pub fn home_dir(&self) -> PathBuf {
        self.home.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".hazelcast")
        })
    }

    /// Where control-plane tokens are stored.
    #[must_use]
    pub fn secrets_dir(&self) -> PathBuf {
        self.home_dir().join("secrets")
    }

    /// The invocation deadline, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Control-plane settings. Empty values fall back to the defaults.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        ApiConfig {
            base_url: non_empty(&self.api_base)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_key: non_empty(&self.api_key),
            api_secret: non_empty(&self.api_secret),
            api_class: non_empty(&self.api_class)
                .unwrap_or_else(|| DEFAULT_API_CLASS.to_string()),
        }
    }
}
