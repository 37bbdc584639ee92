//! # clc-plug
//!
//! The command plugin framework behind the `clc` binary.
//!
//! Commands implement [`Command`]: `init` fills a [`Declaration`] once at
//! startup, and `exec` runs against a fresh [`ExecContext`] per invocation.
//! A [`CommandRegistry`] maps paths such as `map:get` to commands.
//!
//! The context hands a command its [`Properties`], positional arguments,
//! the cluster [`InvocationGateway`], control-plane access, and
//! [`ExecContext::execute_blocking`], which runs one piece of blocking work
//! under the invocation's [`CancelScope`] while a [`StatusDisplay`] shows
//! progress.
//!
//! ```rust,no_run
//! use std::future::Future;
//! use std::pin::Pin;
//!
//! use clc_plug::{Column, Command, Declaration, ExecContext, Result};
//!
//! struct Hello;
//!
//! impl Command for Hello {
//!     fn init(&self, decl: &mut Declaration) -> Result<()> {
//!         decl.add_string_arg("who", "WHO")
//!             .set_command_help("Greets someone", "Greet");
//!         Ok(())
//!     }
//!
//!     fn exec<'a>(
//!         &'a self,
//!         ec: &'a ExecContext,
//!     ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
//!         Box::pin(async move {
//!             let who = ec.required_arg("who")?;
//!             ec.add_output_rows([vec![Column::string("Greeting", format!("hello {who}"))]]);
//!             Ok(())
//!         })
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cancel;
pub mod command;
pub mod context;
pub mod declaration;
pub mod error;
pub mod gateway;
pub mod output;
pub mod properties;
pub mod registry;
pub mod status;

pub use cancel::CancelScope;
pub use command::Command;
pub use context::{ExecContext, ExecContextBuilder};
pub use declaration::{ArgSpec, CommandGroup, Declaration, FlagKind, FlagSpec};
pub use error::{CancelReason, Error, Result};
pub use gateway::InvocationGateway;
pub use output::{Column, OutputSink, Row};
pub use properties::{PropValue, Properties, PropertiesBuilder};
pub use registry::{CommandRegistry, PATH_SEPARATOR};
pub use status::{NoopStatus, StatusDisplay, StatusHandle, TerminalSpinner};
