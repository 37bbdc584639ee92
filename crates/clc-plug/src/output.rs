//! Output rows produced by commands.

use clc_proto::{Value, ValueType};
use parking_lot::Mutex;

/// Column carrying a decoded value.
pub const NAME_VALUE: &str = "Value";
/// Column carrying a value's type name.
pub const NAME_VALUE_TYPE: &str = "ValueType";
/// Column carrying a decoded key.
pub const NAME_KEY: &str = "Key";
/// Column carrying a key's type name.
pub const NAME_KEY_TYPE: &str = "KeyType";

/// One named, typed cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Stable column name.
    pub name: String,
    /// Semantic type tag of the value.
    pub ty: ValueType,
    /// The value, or the undecodable placeholder.
    pub value: Value,
}

impl Column {
    /// Build a column.
    pub fn new(name: impl Into<String>, ty: ValueType, value: Value) -> Self {
        Self {
            name: name.into(),
            ty,
            value,
        }
    }

    /// A string column.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ValueType::STRING, Value::String(value.into()))
    }

    /// A string column naming the type of another value.
    pub fn type_name(name: impl Into<String>, ty: ValueType) -> Self {
        Self::string(name, ty.name())
    }
}

/// An ordered sequence of columns.
pub type Row = Vec<Column>;

/// Append-only row buffer owned by one invocation.
#[derive(Debug, Default)]
pub struct OutputSink {
    rows: Mutex<Vec<Row>>,
}

impl OutputSink {
    /// An empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows after any already emitted.
    pub fn push(&self, rows: impl IntoIterator<Item = Row>) {
        self.rows.lock().extend(rows);
    }

    /// Number of rows emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// Whether nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    /// Copy of the rows emitted so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Row> {
        self.rows.lock().clone()
    }

    /// Take ownership of the rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows.into_inner()
    }
}
