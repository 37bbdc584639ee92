//! Control-plane configuration.

/// Overrides the control-plane base URL.
pub const ENV_API_BASE_URL: &str = "HZ_CLOUD_COORDINATOR_BASE_URL";
/// API key used to log in.
pub const ENV_API_KEY: &str = "CLC_VIRIDIAN_API_KEY";
/// API secret used to log in.
pub const ENV_API_SECRET: &str = "CLC_VIRIDIAN_API_SECRET";
/// Experimental API selector; also the namespace tokens are stored under.
pub const ENV_API_CLASS: &str = "CLC_EXPERIMENTAL_VIRIDIAN_API";

/// Base URL used when no override is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://api.viridian.hazelcast.com";
/// API class used when no override is configured.
pub const DEFAULT_API_CLASS: &str = "api";

/// Resolved control-plane settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every request path is joined to.
    pub base_url: String,
    /// API key, if configured.
    pub api_key: Option<String>,
    /// API secret, if configured.
    pub api_secret: Option<String>,
    /// API class.
    pub api_class: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            api_secret: None,
            api_class: DEFAULT_API_CLASS.to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve settings from the environment, falling back to defaults for
    /// unset or empty variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            base_url: get(ENV_API_BASE_URL).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_key: get(ENV_API_KEY),
            api_secret: get(ENV_API_SECRET),
            api_class: get(ENV_API_CLASS).unwrap_or_else(|| DEFAULT_API_CLASS.to_string()),
        }
    }

    /// Replace the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key and secret.
    #[must_use]
    pub fn with_credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self.api_secret = Some(secret.into());
        self
    }

    /// Join a request path to the base URL with exactly one separator.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
