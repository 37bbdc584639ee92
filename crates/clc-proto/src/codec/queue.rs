//! Codecs for distributed queue operations.

use super::{bool_frame, data_frame, expect_type, i64_frame, string_frame};
use crate::data::Data;
use crate::error::Result;
use crate::message::ClientMessage;

/// `queue.offer` request.
pub const QUEUE_OFFER_REQUEST: u32 = 0x03_0100;
/// `queue.offer` response.
pub const QUEUE_OFFER_RESPONSE: u32 = 0x03_0101;
/// `queue.poll` request.
pub const QUEUE_POLL_REQUEST: u32 = 0x03_0500;
/// `queue.poll` response.
pub const QUEUE_POLL_RESPONSE: u32 = 0x03_0501;

/// Decoded `queue.offer` request, as seen by a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOfferRequest {
    /// Queue name.
    pub name: String,
    /// Serialized item.
    pub value: Data,
    /// How long the member may wait for capacity.
    pub timeout_millis: i64,
}

/// Decoded `queue.poll` request, as seen by a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePollRequest {
    /// Queue name.
    pub name: String,
    /// How long the member may wait for an item.
    pub timeout_millis: i64,
}

/// Encode a `queue.offer` request.
#[must_use]
pub fn encode_queue_offer_request(name: &str, value: &Data, timeout_millis: i64) -> ClientMessage {
    ClientMessage::new(QUEUE_OFFER_REQUEST)
        .with_frame(name.as_bytes())
        .with_frame(value.as_bytes())
        .with_frame(timeout_millis.to_be_bytes())
}

/// Decode a `queue.offer` request.
///
/// # Errors
///
/// Returns an error if the message is not a well-formed `queue.offer` request.
pub fn decode_queue_offer_request(msg: &ClientMessage) -> Result<QueueOfferRequest> {
    expect_type(msg, QUEUE_OFFER_REQUEST)?;
    Ok(QueueOfferRequest {
        name: string_frame(msg, 0, "name")?,
        value: data_frame(msg, 1, "value")?,
        timeout_millis: i64_frame(msg, 2, "timeoutMillis")?,
    })
}

/// Encode a `queue.offer` response.
#[must_use]
pub fn encode_queue_offer_response(accepted: bool) -> ClientMessage {
    ClientMessage::new(QUEUE_OFFER_RESPONSE).with_frame([u8::from(accepted)])
}

/// Decode a `queue.offer` response: whether the item was accepted.
///
/// # Errors
///
/// Returns an error if the message is not a well-formed `queue.offer` response.
pub fn decode_queue_offer_response(msg: &ClientMessage) -> Result<bool> {
    expect_type(msg, QUEUE_OFFER_RESPONSE)?;
    bool_frame(msg, 0, "response")
}

/// Encode a `queue.poll` request.
#[must_use]
pub fn encode_queue_poll_request(name: &str, timeout_millis: i64) -> ClientMessage {
    ClientMessage::new(QUEUE_POLL_REQUEST)
        .with_frame(name.as_bytes())
        .with_frame(timeout_millis.to_be_bytes())
}

/// Decode a `queue.poll` request.
///
/// # Errors
///
/// Returns an error if the message is not a well-formed `queue.poll` request.
pub fn decode_queue_poll_request(msg: &ClientMessage) -> Result<QueuePollRequest> {
    expect_type(msg, QUEUE_POLL_REQUEST)?;
    Ok(QueuePollRequest {
        name: string_frame(msg, 0, "name")?,
        timeout_millis: i64_frame(msg, 1, "timeoutMillis")?,
    })
}

/// Encode a `queue.poll` response; `None` means the queue was empty.
#[must_use]
pub fn encode_queue_poll_response(item: Option<&Data>) -> ClientMessage {
    ClientMessage::new(QUEUE_POLL_RESPONSE).with_frame(item.map(Data::as_bytes).unwrap_or_default())
}

/// Decode a `queue.poll` response. An empty queue decodes to `None`.
///
/// # Errors
///
/// Returns an error if the message is not a well-formed `queue.poll` response.
pub fn decode_queue_poll_response(msg: &ClientMessage) -> Result<Option<Data>> {
    expect_type(msg, QUEUE_POLL_RESPONSE)?;
    let data = data_frame(msg, 0, "response")?;
    Ok((!data.is_null()).then_some(data))
}
