//! Per-operation request/response codecs.
//!
//! Each operation provides the client-side pair (`encode_*_request`,
//! `decode_*_response`) and the member-side pair used by in-process fakes
//! (`decode_*_request`, `encode_*_response`).

pub mod map;
pub mod queue;

use crate::data::Data;
use crate::error::{ProtoError, Result};
use crate::message::ClientMessage;

fn expect_type(msg: &ClientMessage, expected: u32) -> Result<()> {
    if msg.message_type() == expected {
        Ok(())
    } else {
        Err(ProtoError::InvalidMessageType(msg.message_type()))
    }
}

fn string_frame(msg: &ClientMessage, index: usize, field: &'static str) -> Result<String> {
    let frame = msg.frame(index).ok_or(ProtoError::MissingFrame(field))?;
    String::from_utf8(frame.to_vec())
        .map_err(|e| ProtoError::MalformedData(format!("{field}: {e}")))
}

fn data_frame(msg: &ClientMessage, index: usize, field: &'static str) -> Result<Data> {
    let frame = msg.frame(index).ok_or(ProtoError::MissingFrame(field))?;
    Data::from_bytes(frame.to_vec())
}

fn i64_frame(msg: &ClientMessage, index: usize, field: &'static str) -> Result<i64> {
    let frame = msg.frame(index).ok_or(ProtoError::MissingFrame(field))?;
    let bytes: [u8; 8] = frame
        .try_into()
        .map_err(|_| ProtoError::MalformedData(format!("{field}: expected 8 bytes")))?;
    Ok(i64::from_be_bytes(bytes))
}

fn bool_frame(msg: &ClientMessage, index: usize, field: &'static str) -> Result<bool> {
    match msg.frame(index).ok_or(ProtoError::MissingFrame(field))? {
        [0] => Ok(false),
        [1] => Ok(true),
        other => Err(ProtoError::MalformedData(format!(
            "{field}: expected one byte of 0 or 1, got {other:?}"
        ))),
    }
}
