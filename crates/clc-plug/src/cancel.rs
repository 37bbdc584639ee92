//! Per-invocation cancellation scope.
//!
//! A [`CancelScope`] combines a user-interrupt signal with an optional
//! deadline. Every suspension point in a command selects on
//! [`CancelScope::cancelled`] so that either source stops the work promptly.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{CancelReason, Error, Result};

/// Cancellation signal and deadline for one invocation.
#[derive(Debug, Clone, Default)]
pub struct CancelScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelScope {
    /// A scope with no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this scope whose deadline is at most `timeout` from now.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        };
        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    /// The interrupt token. Cancelling it cancels every clone of this scope.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Signal an interrupt.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Why the scope has fired, or `None` while it is still live.
    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            Some(CancelReason::Interrupted)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(CancelReason::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Whether the scope has fired.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.reason().is_some()
    }

    /// Fail fast if the scope has fired.
    pub fn check(&self) -> Result<()> {
        self.reason().map_or(Ok(()), |r| Err(Error::Canceled(r)))
    }

    /// Resolves when the scope fires.
    pub async fn cancelled(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => CancelReason::Interrupted,
                    () = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                CancelReason::Interrupted
            }
        }
    }

    /// Drive `fut` unless the scope fires first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            reason = self.cancelled() => Err(Error::Canceled(reason)),
            out = fut => out,
        }
    }
}
