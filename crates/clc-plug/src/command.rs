//! The two-phase command contract.

use std::future::Future;
use std::pin::Pin;

use crate::context::ExecContext;
use crate::declaration::Declaration;
use crate::error::Result;

/// A registered command.
///
/// One instance serves every invocation of its path, so implementations
/// keep no per-invocation state; everything an invocation needs arrives
/// through the [`ExecContext`].
pub trait Command: Send + Sync {
    /// Declare flags, arguments, help and grouping.
    ///
    /// Called once before any [`Command::exec`]. Must not do anything except
    /// fill in `decl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot describe itself; the process
    /// aborts at startup.
    fn init(&self, decl: &mut Declaration) -> Result<()>;

    /// Run the command, writing zero or more rows to the context.
    ///
    /// # Errors
    ///
    /// Returns the first failure; cancellation surfaces as
    /// [`Error::Canceled`](crate::Error::Canceled).
    fn exec<'a>(
        &'a self,
        ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
