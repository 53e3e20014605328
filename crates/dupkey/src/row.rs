//! Ordered column → value rows.
//!
//! A [`Row`] is one record of a bulk insert. Column order matters: the first
//! row of a batch decides the column list of the generated statement.
//!
//! # Example
//! ```
//! use dupkey::Row;
//!
//! let row = Row::new()
//!     .set("id", 1)
//!     .set("email", "user1@email.com")
//!     .set("name", "User One");
//! assert_eq!(row.columns().collect::<Vec<_>>(), ["id", "email", "name"]);
//! ```

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use serde::Serialize;

/// An ordered set of `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value.
    ///
    /// Setting a column twice replaces the earlier value and keeps its position.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// In-place variant of [`Row::set`].
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn has_column(&self, column: &str) -> bool {
        self.entries.iter().any(|(c, _)| c == column)
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }

    /// Build a row from a JSON object, preserving key order.
    pub fn from_json(value: serde_json::Value) -> OrmResult<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, Value::from_json(v)))
                .collect()),
            other => Err(OrmError::validation(format!(
                "Row must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build a row from any `Serialize` struct (field order is kept).
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> OrmResult<Self> {
        Self::from_json(serde_json::to_value(value)?)
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Row
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Types that can be turned into a [`Row`].
///
/// Use `#[derive(ToRow)]` for structs.
pub trait ToRow {
    fn to_row(&self) -> Row;
}

impl ToRow for Row {
    fn to_row(&self) -> Row {
        self.clone()
    }
}
