use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque position token handed to callers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Cursor {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Cursor {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded cursor: column/value pairs in ordering-key order. Columns that were
/// null when the cursor was minted are absent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CursorValues(Vec<(String, Value)>);

impl CursorValues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.0.push((column.into(), value));
    }

    /// The non-null value recorded for `column`, if any.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .filter(|value| !value.is_null())
    }

    /// True when at least one column carries a usable value.
    pub fn has_values(&self) -> bool {
        self.0.iter().any(|(_, value)| !value.is_null())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for CursorValues {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_entries_do_not_count() {
        let values: CursorValues = [("id", Value::Null)].into_iter().collect();
        assert!(!values.has_values());
        assert_eq!(values.get("id"), None);
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_lookup_keeps_order() {
        let values: CursorValues = [("a", Value::Int(1)), ("b", Value::from("x"))]
            .into_iter()
            .collect();
        let names: Vec<_> = values.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(values.get("b"), Some(&Value::from("x")));
    }
}
