//! # clc-proto
//!
//! The cluster-protocol surface the command-line client depends on.
//!
//! The wire encoding of cluster requests is treated as an opaque codec:
//! commands build a [`ClientMessage`] with one of the [`codec`] encoders,
//! hand it to an invocation gateway, and decode the reply with the matching
//! decoder. Values travel as type-tagged [`Data`] blobs and are interpreted
//! by [`serialization`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod data;
pub mod error;
pub mod message;
pub mod serialization;
pub mod types;
pub mod value;

pub use data::Data;
pub use error::{ProtoError, Result};
pub use message::ClientMessage;
pub use types::ValueType;
pub use value::Value;
