//! Decoded values.

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A value decoded from the cluster, or a placeholder for one that could not be.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    Int8(i8),
    /// UTF-16 code unit rendered as a character.
    Char(char),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// String array.
    StringArray(Vec<String>),
    /// JSON document text.
    Json(String),
    /// Local date and time.
    DateTime(NaiveDateTime),
    /// The value is present but its type has no decoder here.
    Undecodable {
        /// Name of the declared type.
        type_name: String,
    },
}

impl Value {
    /// Placeholder for a value of the given type.
    #[must_use]
    pub fn undecodable(type_name: impl Into<String>) -> Self {
        Self::Undecodable {
            type_name: type_name.into(),
        }
    }

    /// Whether this is the undecodable placeholder.
    #[must_use]
    pub const fn is_undecodable(&self) -> bool {
        matches!(self, Self::Undecodable { .. })
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int64(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("-"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int8(n) => write!(f, "{n}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Int16(n) => write!(f, "{n}"),
            Self::Int32(n) => write!(f, "{n}"),
            Self::Int64(n) => write!(f, "{n}"),
            Self::Float32(n) => write!(f, "{n}"),
            Self::Float64(n) => write!(f, "{n}"),
            Self::String(s) | Self::Json(s) => f.write_str(s),
            Self::Bytes(bytes) => {
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Self::StringArray(items) => write!(f, "[{}]", items.join(", ")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::Undecodable { type_name } => write!(f, "(undecodable: {type_name})"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int8(n) => serializer.serialize_i8(*n),
            Self::Char(c) => serializer.serialize_char(*c),
            Self::Int16(n) => serializer.serialize_i16(*n),
            Self::Int32(n) => serializer.serialize_i32(*n),
            Self::Int64(n) => serializer.serialize_i64(*n),
            Self::Float32(n) => serializer.serialize_f32(*n),
            Self::Float64(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::Bytes(bytes) => serializer.serialize_bytes(bytes),
            Self::StringArray(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Json(text) => match serde_json::from_str::<serde_json::Value>(text) {
                Ok(doc) => doc.serialize(serializer),
                Err(_) => serializer.serialize_str(text),
            },
            Self::DateTime(_) | Self::Undecodable { .. } => serializer.collect_str(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_renders_type_name() {
        let value = Value::undecodable("CUSTOM(42)");
        assert!(value.is_undecodable());
        assert_eq!(value.to_string(), "(undecodable: CUSTOM(42))");
    }

    #[test]
    fn display_formats() {
        assert_eq!(Value::Null.to_string(), "-");
        assert_eq!(Value::Bytes(vec![0xca, 0xfe]).to_string(), "cafe");
        assert_eq!(
            Value::StringArray(vec!["a".into(), "b".into()]).to_string(),
            "[a, b]"
        );
    }

    #[test]
    fn json_values_serialize_as_documents() {
        let value = Value::Json(r#"{"a":1}"#.into());
        let out = serde_json::to_string(&value).expect("serialize");
        assert_eq!(out, r#"{"a":1}"#);
    }

    #[test]
    fn placeholder_serializes_as_string() {
        let out = serde_json::to_string(&Value::undecodable("PORTABLE")).expect("serialize");
        assert_eq!(out, r#""(undecodable: PORTABLE)""#);
    }
}
