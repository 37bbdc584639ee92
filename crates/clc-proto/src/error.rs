//! Error types for the clc-proto crate.

use thiserror::Error;

use crate::types::ValueType;

/// Errors that can occur while encoding or decoding protocol payloads.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// The value type has no built-in decoder.
    #[error("unsupported type: {0}")]
    UnsupportedType(ValueType),

    /// The payload ended before the value was fully read.
    #[error("truncated {ty} payload: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Type being decoded.
        ty: ValueType,
        /// Bytes the next read required.
        needed: usize,
        /// Bytes left in the payload.
        remaining: usize,
    },

    /// The payload was long enough but its content is invalid.
    #[error("invalid {ty} payload: {reason}")]
    InvalidPayload {
        /// Type being decoded.
        ty: ValueType,
        /// What was wrong with it.
        reason: String,
    },

    /// The serialized blob is too short to carry a header.
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// A message did not carry a frame the codec requires.
    #[error("missing frame: {0}")]
    MissingFrame(&'static str),

    /// The message type does not match the codec.
    #[error("invalid message type: {0:#08x}")]
    InvalidMessageType(u32),

    /// The value cannot be serialized.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtoError>;
