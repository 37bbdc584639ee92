//! Serialized value blobs.

use std::fmt;

use crate::error::{ProtoError, Result};
use crate::types::ValueType;

const TYPE_OFFSET: usize = 4;
const PAYLOAD_OFFSET: usize = 8;

/// A serialized value as it travels on the wire.
///
/// Layout: 4-byte partition hash, 4-byte big-endian type id, payload.
/// An empty blob is the serialized form of null.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Data(Vec<u8>);

impl Data {
    /// Wrap raw bytes received from the cluster.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are non-empty but shorter than the header.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if !bytes.is_empty() && bytes.len() < PAYLOAD_OFFSET {
            return Err(ProtoError::MalformedData(format!(
                "{} bytes is shorter than the {PAYLOAD_OFFSET}-byte header",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Build a blob from a type tag and payload.
    ///
    /// The partition hash is left zero; the member derives it from the
    /// payload when routing.
    #[must_use]
    pub fn from_parts(ty: ValueType, payload: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(PAYLOAD_OFFSET + payload.len());
        bytes.extend_from_slice(&0_i32.to_be_bytes());
        bytes.extend_from_slice(&ty.id().to_be_bytes());
        bytes.extend_from_slice(payload);
        Self(bytes)
    }

    /// The serialized null value.
    #[must_use]
    pub const fn null() -> Self {
        Self(Vec::new())
    }

    /// Whether this blob is the serialized null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }

    /// Declared type of the value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self.0.get(TYPE_OFFSET..PAYLOAD_OFFSET) {
            Some(&[a, b, c, d]) => ValueType::new(i32::from_be_bytes([a, b, c, d])),
            _ => ValueType::NULL,
        }
    }

    /// Bytes after the header.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.0.get(PAYLOAD_OFFSET..).unwrap_or_default()
    }

    /// Full serialized form.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the serialized form.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("type", &self.value_type())
            .field("payload_len", &self.payload().len())
            .finish()
    }
}
