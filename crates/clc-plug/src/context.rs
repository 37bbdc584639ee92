//! Per-invocation capability bundle and the blocking-task runner.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clc_secrets::SecretStore;
use clc_viridian::{Api, ApiClient, ApiConfig};
use tokio::time::MissedTickBehavior;
use tracing::{Span, debug, info_span};

use crate::cancel::CancelScope;
use crate::error::{Error, Result};
use crate::gateway::InvocationGateway;
use crate::output::{OutputSink, Row};
use crate::properties::Properties;
use crate::status::{NoopStatus, StatusDisplay, StatusGuard, StatusHandle};

/// How often the status display is refreshed.
pub const STATUS_INTERVAL: Duration = Duration::from_millis(100);

/// Everything a command can reach while it runs.
///
/// Built fresh for each invocation and dropped when `exec` returns.
pub struct ExecContext {
    path: String,
    props: Properties,
    args: Vec<String>,
    named_args: BTreeMap<String, String>,
    scope: CancelScope,
    gateway: Option<Arc<dyn InvocationGateway>>,
    api_config: ApiConfig,
    secrets: Option<SecretStore>,
    status: Arc<dyn StatusDisplay>,
    output: OutputSink,
    blocking: AtomicBool,
    span: Span,
}

impl std::fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("path", &self.path)
            .field("props", &self.props)
            .field("args", &self.args)
            .field("connected", &self.gateway.is_some())
            .finish_non_exhaustive()
    }
}

impl ExecContext {
    /// Start building a context for the command at `path`.
    #[must_use]
    pub fn builder(path: impl Into<String>) -> ExecContextBuilder {
        ExecContextBuilder::new(path)
    }

    /// Path of the running command.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read-only flag values.
    #[must_use]
    pub const fn props(&self) -> &Properties {
        &self.props
    }

    /// Positional argument at `index`.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// All positional arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Named positional argument.
    #[must_use]
    pub fn string_arg(&self, name: &str) -> Option<&str> {
        self.named_args.get(name).map(String::as_str)
    }

    /// Named positional argument that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when it is missing.
    pub fn required_arg(&self, name: &str) -> Result<&str> {
        self.string_arg(name)
            .ok_or_else(|| Error::InvalidArgument(format!("missing argument '{name}'")))
    }

    /// The invocation's cancel scope.
    #[must_use]
    pub const fn scope(&self) -> &CancelScope {
        &self.scope
    }

    /// The cluster gateway.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] when no cluster is configured.
    pub fn gateway(&self) -> Result<&dyn InvocationGateway> {
        self.gateway.as_deref().ok_or(Error::NotConnected)
    }

    /// Control-plane settings.
    #[must_use]
    pub const fn api_config(&self) -> &ApiConfig {
        &self.api_config
    }

    /// The secret store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when none is configured.
    pub fn secrets(&self) -> Result<&SecretStore> {
        self.secrets
            .as_ref()
            .ok_or_else(|| Error::Config("secret store is not configured".to_string()))
    }

    /// A control-plane client carrying the stored token for the configured
    /// API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] when no token is stored, or the
    /// storage error when it cannot be read.
    pub async fn api_client(&self) -> Result<ApiClient> {
        let key = self
            .api_config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(Error::NotLoggedIn)?;
        let secrets = self.secrets()?;
        let read = secrets.read(&self.api_config.api_class, key);
        let token = match self.scope.run(async { read.await.map_err(Error::from) }).await {
            Ok(token) => token,
            Err(Error::Secrets(e)) if e.is_not_found() => return Err(Error::NotLoggedIn),
            Err(e) => return Err(e),
        };
        let token = String::from_utf8(token)
            .map_err(|_| Error::Config("stored token is not valid UTF-8".to_string()))?;
        Ok(ApiClient::new(&self.api_config, token))
    }

    /// Typed control-plane endpoints using [`ExecContext::api_client`].
    ///
    /// # Errors
    ///
    /// Same as [`ExecContext::api_client`].
    pub async fn api(&self) -> Result<Api> {
        Ok(Api::new(self.api_client().await?))
    }

    /// Append rows to the output.
    pub fn add_output_rows(&self, rows: impl IntoIterator<Item = Row>) {
        self.output.push(rows);
    }

    /// Rows emitted so far.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        self.output.snapshot()
    }

    /// Consume the context, keeping its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.output.into_rows()
    }

    /// The invocation's logging span.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Run `work` while showing `text` as status, honoring cancellation.
    ///
    /// `work` receives the cancel scope and a [`StatusHandle`] to update the
    /// text. The result is `work`'s own unless the scope fires first, in
    /// which case it is [`Error::Canceled`] and `work` is dropped. The
    /// status display is stopped exactly once on every path.
    ///
    /// # Errors
    ///
    /// Returns `work`'s error, [`Error::Canceled`], or
    /// [`Error::NestedBlocking`] if called from inside another blocking
    /// scope of this invocation.
    pub async fn execute_blocking<F, Fut, T>(&self, text: &str, work: F) -> Result<T>
    where
        F: FnOnce(CancelScope, StatusHandle) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.blocking.swap(true, Ordering::AcqRel) {
            return Err(Error::NestedBlocking);
        }
        let _release = BlockingFlag(&self.blocking);
        let guard = StatusGuard::new(self.status.as_ref());
        self.scope.check()?;

        let (handle, mut rx) = StatusHandle::channel(text);
        let work = work(self.scope.clone(), handle);
        tokio::pin!(work);

        let mut ticker = tokio::time::interval(STATUS_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                reason = self.scope.cancelled() => {
                    debug!(path = %self.path, %reason, "blocking work canceled");
                    return Err(Error::Canceled(reason));
                }
                out = &mut work => return out,
                _ = ticker.tick() => {
                    let current = rx.borrow_and_update().clone();
                    guard.render(&current);
                }
            }
        }
    }
}

struct BlockingFlag<'a>(&'a AtomicBool);

impl Drop for BlockingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builder for [`ExecContext`].
pub struct ExecContextBuilder {
    path: String,
    props: Properties,
    args: Vec<String>,
    named_args: BTreeMap<String, String>,
    scope: CancelScope,
    gateway: Option<Arc<dyn InvocationGateway>>,
    api_config: ApiConfig,
    secrets: Option<SecretStore>,
    status: Arc<dyn StatusDisplay>,
}

impl ExecContextBuilder {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            props: Properties::default(),
            args: Vec::new(),
            named_args: BTreeMap::new(),
            scope: CancelScope::new(),
            gateway: None,
            api_config: ApiConfig::default(),
            secrets: None,
            status: Arc::new(NoopStatus),
        }
    }

    /// Set the flag values.
    #[must_use]
    pub fn props(mut self, props: Properties) -> Self {
        self.props = props;
        self
    }

    /// Set the positional arguments.
    #[must_use]
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Add a named positional argument.
    #[must_use]
    pub fn named_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.named_args.insert(name.into(), value.into());
        self
    }

    /// Set the cancel scope.
    #[must_use]
    pub fn scope(mut self, scope: CancelScope) -> Self {
        self.scope = scope;
        self
    }

    /// Attach a cluster gateway.
    #[must_use]
    pub fn gateway(mut self, gateway: Arc<dyn InvocationGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set control-plane settings.
    #[must_use]
    pub fn api_config(mut self, config: ApiConfig) -> Self {
        self.api_config = config;
        self
    }

    /// Attach a secret store.
    #[must_use]
    pub fn secrets(mut self, secrets: SecretStore) -> Self {
        self.secrets = Some(secrets);
        self
    }

    /// Set the status display.
    #[must_use]
    pub fn status(mut self, status: Arc<dyn StatusDisplay>) -> Self {
        self.status = status;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ExecContext {
        let span = info_span!("command", path = %self.path);
        ExecContext {
            path: self.path,
            props: self.props,
            args: self.args,
            named_args: self.named_args,
            scope: self.scope,
            gateway: self.gateway,
            api_config: self.api_config,
            secrets: self.secrets,
            status: self.status,
            output: OutputSink::new(),
            blocking: AtomicBool::new(false),
            span,
        }
    }
}
