//! Codecs for distributed map operations.

use super::{data_frame, expect_type, i64_frame, string_frame};
use crate::data::Data;
use crate::error::{ProtoError, Result};
use crate::message::ClientMessage;

/// `map.get` request.
pub const MAP_GET_REQUEST: u32 = 0x01_0200;
/// `map.get` response.
pub const MAP_GET_RESPONSE: u32 = 0x01_0201;
/// `map.entrySet` request.
pub const MAP_ENTRY_SET_REQUEST: u32 = 0x01_2500;
/// `map.entrySet` response.
pub const MAP_ENTRY_SET_RESPONSE: u32 = 0x01_2501;

/// Decoded `map.get` request, as seen by a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGetRequest {
    /// Map name.
    pub name: String,
    /// Serialized key.
    pub key: Data,
    /// Calling thread id, used for lock ownership.
    pub thread_id: i64,
}

/// Encode a `map.get` request.
#[must_use]
pub fn encode_map_get_request(name: &str, key: &Data, thread_id: i64) -> ClientMessage {
    ClientMessage::new(MAP_GET_REQUEST)
        .with_frame(name.as_bytes())
        .with_frame(key.as_bytes())
        .with_frame(thread_id.to_be_bytes())
}

/// Decode a `map.get` request.
///
/// # Errors
///
/// Returns an error if the message is not a well-formed `map.get` request.
pub fn decode_map_get_request(msg: &ClientMessage) -> Result<MapGetRequest> {
    expect_type(msg, MAP_GET_REQUEST)?;
    Ok(MapGetRequest {
        name: string_frame(msg, 0, "name")?,
        key: data_frame(msg, 1, "key")?,
        thread_id: i64_frame(msg, 2, "threadId")?,
    })
}

/// Encode a `map.get` response; `None` means the key is absent.
#[must_use]
pub fn encode_map_get_response(value: Option<&Data>) -> ClientMessage {
    ClientMessage::new(MAP_GET_RESPONSE).with_frame(value.map(Data::as_bytes).unwrap_or_default())
}

/// Decode a `map.get` response. An absent key decodes to the null blob.
///
/// # Errors
///
/// Returns an error if the message is not a well-formed `map.get` response.
pub fn decode_map_get_response(msg: &ClientMessage) -> Result<Data> {
    expect_type(msg, MAP_GET_RESPONSE)?;
    data_frame(msg, 0, "response")
}

/// Encode a `map.entrySet` request.
#[must_use]
pub fn encode_map_entry_set_request(name: &str) -> ClientMessage {
    ClientMessage::new(MAP_ENTRY_SET_REQUEST).with_frame(name.as_bytes())
}

/// Decode a `map.entrySet` request, returning the map name.
///
/// # Errors
///
/// Returns an error if the message is not a well-formed `map.entrySet` request.
pub fn decode_map_entry_set_request(msg: &ClientMessage) -> Result<String> {
    expect_type(msg, MAP_ENTRY_SET_REQUEST)?;
    string_frame(msg, 0, "name")
}

/// Encode a `map.entrySet` response as alternating key and value frames.
#[must_use]
pub fn encode_map_entry_set_response(pairs: &[(Data, Data)]) -> ClientMessage {
    let mut msg = ClientMessage::new(MAP_ENTRY_SET_RESPONSE);
    for (key, value) in pairs {
        msg.push_frame(key.as_bytes());
        msg.push_frame(value.as_bytes());
    }
    msg
}

/// Decode a `map.entrySet` response into key/value pairs.
///
/// # Errors
///
/// Returns an error if the message type is wrong or a key has no value.
pub fn decode_map_entry_set_response(msg: &ClientMessage) -> Result<Vec<(Data, Data)>> {
    expect_type(msg, MAP_ENTRY_SET_RESPONSE)?;
    let frames = msg.frames();
    if frames.len() % 2 != 0 {
        return Err(ProtoError::MissingFrame("value"));
    }
    frames
        .chunks_exact(2)
        .map(|pair| {
            Ok((
                Data::from_bytes(pair[0].clone())?,
                Data::from_bytes(pair[1].clone())?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::encode;
    use crate::value::Value;

    fn string_data(s: &str) -> Data {
        encode(&Value::String(s.into())).expect("encode")
    }

    #[test]
    fn get_request_is_readable_by_member() {
        let key = string_data("k1");
        let msg = encode_map_get_request("orders", &key, 0);
        let req = decode_map_get_request(&msg).expect("decode");
        assert_eq!(req.name, "orders");
        assert_eq!(req.key, key);
        assert_eq!(req.thread_id, 0);
    }

    #[test]
    fn absent_key_decodes_to_null() {
        let msg = encode_map_get_response(None);
        let data = decode_map_get_response(&msg).expect("decode");
        assert!(data.is_null());
    }

    #[test]
    fn get_response_rejects_wrong_type() {
        let msg = encode_map_entry_set_response(&[]);
        let err = decode_map_get_response(&msg).expect_err("wrong type");
        assert!(matches!(err, ProtoError::InvalidMessageType(MAP_ENTRY_SET_RESPONSE)));
    }

    #[test]
    fn entry_set_keeps_pair_order() {
        let pairs = vec![
            (string_data("a"), string_data("1")),
            (string_data("b"), string_data("2")),
        ];
        let msg = encode_map_entry_set_response(&pairs);
        assert_eq!(decode_map_entry_set_response(&msg).expect("decode"), pairs);
    }

    #[test]
    fn empty_entry_set_decodes_to_no_pairs() {
        let msg = encode_map_entry_set_response(&[]);
        assert!(decode_map_entry_set_response(&msg).expect("decode").is_empty());
    }

    #[test]
    fn dangling_key_is_rejected() {
        let msg = ClientMessage::new(MAP_ENTRY_SET_RESPONSE).with_frame(string_data("a").into_bytes());
        assert!(matches!(
            decode_map_entry_set_response(&msg),
            Err(ProtoError::MissingFrame("value"))
        ));
    }

    #[test]
    fn entry_set_request_carries_name() {
        let msg = encode_map_entry_set_request("users");
        assert_eq!(decode_map_entry_set_request(&msg).expect("decode"), "users");
    }
}
