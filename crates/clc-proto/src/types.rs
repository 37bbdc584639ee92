//! Semantic type tags carried by serialized values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a serialized value.
///
/// Negative identifiers are reserved for built-in types; positive identifiers
/// belong to application-registered serializers the client knows nothing
/// about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueType(i32);

impl ValueType {
    /// Null value.
    pub const NULL: Self = Self(0);
    /// Portable serialized object.
    pub const PORTABLE: Self = Self(-1);
    /// Identified data-serializable object.
    pub const DATA_SERIALIZABLE: Self = Self(-2);
    /// Signed 8-bit integer.
    pub const INT8: Self = Self(-3);
    /// Boolean.
    pub const BOOL: Self = Self(-4);
    /// UTF-16 code unit.
    pub const UINT16: Self = Self(-5);
    /// Signed 16-bit integer.
    pub const INT16: Self = Self(-6);
    /// Signed 32-bit integer.
    pub const INT32: Self = Self(-7);
    /// Signed 64-bit integer.
    pub const INT64: Self = Self(-8);
    /// 32-bit float.
    pub const FLOAT32: Self = Self(-9);
    /// 64-bit float.
    pub const FLOAT64: Self = Self(-10);
    /// UTF-8 string.
    pub const STRING: Self = Self(-11);
    /// Byte array.
    pub const INT8_ARRAY: Self = Self(-12);
    /// String array.
    pub const STRING_ARRAY: Self = Self(-20);
    /// UUID.
    pub const UUID: Self = Self(-21);
    /// Local date and time without offset.
    pub const JAVA_LOCAL_DATE_TIME: Self = Self(-53);
    /// Compact serialized object.
    pub const COMPACT: Self = Self(-55);
    /// JSON document.
    pub const JSON: Self = Self(-130);

    /// Wrap a raw type identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// The raw type identifier.
    #[must_use]
    pub const fn id(self) -> i32 {
        self.0
    }

    /// Whether the identifier belongs to an application serializer.
    #[must_use]
    pub const fn is_custom(self) -> bool {
        self.0 > 0
    }

    /// Human-readable type name.
    #[must_use]
    pub fn name(self) -> String {
        let known = match self {
            Self::NULL => "NULL",
            Self::PORTABLE => "PORTABLE",
            Self::DATA_SERIALIZABLE => "DATA_SERIALIZABLE",
            Self::INT8 => "INT8",
            Self::BOOL => "BOOL",
            Self::UINT16 => "UINT16",
            Self::INT16 => "INT16",
            Self::INT32 => "INT32",
            Self::INT64 => "INT64",
            Self::FLOAT32 => "FLOAT32",
            Self::FLOAT64 => "FLOAT64",
            Self::STRING => "STRING",
            Self::INT8_ARRAY => "INT8_ARRAY",
            Self::STRING_ARRAY => "STRING_ARRAY",
            Self::UUID => "UUID",
            Self::JAVA_LOCAL_DATE_TIME => "JAVA_LOCAL_DATE_TIME",
            Self::COMPACT => "COMPACT",
            Self::JSON => "JSON",
            Self(id) if id > 0 => return format!("CUSTOM({id})"),
            Self(id) => return format!("UNKNOWN({id})"),
        };
        known.to_string()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<i32> for ValueType {
    fn from(id: i32) -> Self {
        Self(id)
    }
}
