//! Read-only invocation properties.

use std::collections::BTreeMap;

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    /// String flag or argument.
    String(String),
    /// Boolean flag.
    Bool(bool),
    /// Integer flag.
    Int(i64),
}

/// Immutable mapping from flag or argument name to value, built once per
/// invocation before the command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, PropValue>,
}

impl Properties {
    /// Start building a property set.
    #[must_use]
    pub fn builder() -> PropertiesBuilder {
        PropertiesBuilder::default()
    }

    /// Raw lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    /// String value, or an empty string when absent or not a string.
    #[must_use]
    pub fn get_string(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(PropValue::String(s)) => s,
            _ => "",
        }
    }

    /// Boolean value, `false` when absent.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(PropValue::Bool(true)))
    }

    /// Integer value, if set.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(PropValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Whether a value is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over all properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Builder for [`Properties`].
#[derive(Debug, Default)]
pub struct PropertiesBuilder {
    values: BTreeMap<String, PropValue>,
}

impl PropertiesBuilder {
    /// Set a string property.
    #[must_use]
    pub fn string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values
            .insert(name.into(), PropValue::String(value.into()));
        self
    }

    /// Set a boolean property.
    #[must_use]
    pub fn bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.values.insert(name.into(), PropValue::Bool(value));
        self
    }

    /// Set an integer property.
    #[must_use]
    pub fn int(mut self, name: impl Into<String>, value: i64) -> Self {
        self.values.insert(name.into(), PropValue::Int(value));
        self
    }

    /// Set a property of any kind.
    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Freeze the set.
    #[must_use]
    pub fn build(self) -> Properties {
        Properties {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let props = Properties::builder()
            .string("name", "orders")
            .bool("show-type", true)
            .int("count", 3)
            .build();
        assert_eq!(props.get_string("name"), "orders");
        assert!(props.get_bool("show-type"));
        assert_eq!(props.get_int("count"), Some(3));
    }

    #[test]
    fn absent_or_mistyped_falls_back() {
        let props = Properties::builder().int("name", 1).build();
        assert_eq!(props.get_string("name"), "");
        assert_eq!(props.get_string("missing"), "");
        assert!(!props.get_bool("name"));
        assert_eq!(props.get_int("missing"), None);
        assert!(props.contains("name"));
    }

    #[test]
    fn later_value_replaces_earlier() {
        let props = Properties::builder()
            .string("name", "a")
            .string("name", "b")
            .build();
        assert_eq!(props.iter().count(), 1);
        assert_eq!(props.get_string("name"), "b");
    }
}
