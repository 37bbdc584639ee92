//! # clc-cli
//!
//! Hazelcast command-line client.
//!
//! Commands register themselves in a [`clc_plug::CommandRegistry`]; the
//! [`app::App`] turns the registry into a clap command tree, parses the
//! command line into an [`app::Invocation`] and runs it with a fresh
//! [`clc_plug::ExecContext`]. Rows the command produces are rendered by
//! [`output::OutputFormat`].
//!
//! ```text
//! argv ──► App::parse ──► Invocation ──► Command::exec ──► rows ──► OutputFormat
//!                                          │
//!                         ┌────────────────┴────────────────┐
//!                         ▼                                 ▼
//!                 InvocationGateway                 Viridian REST API
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use app::{App, Invocation};
pub use cli::{Format, GlobalArgs};
pub use error::CliError;
pub use output::OutputFormat;
