//! # clc-secrets
//!
//! Persists small opaque credentials (control-plane tokens) keyed by
//! `(namespace, name)`.
//!
//! Records live at `<root>/<namespace>/<name>`, base64-encoded, readable and
//! writable by the owner only. Writes go through a temporary file and a
//! rename so a reader never observes a half-written record.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod store;

pub use error::{Error, Result};
pub use store::SecretStore;
