//! Batches of rows for one bulk statement.
//!
//! All rows of a batch share the same set of columns. The first row decides
//! the column order; [`Rows::inline_values`] flattens every row's values in
//! that order so the positional parameters line up with the column list.

use crate::error::{OrmError, OrmResult};
use crate::row::{Row, ToRow, json_kind};
use crate::value::Value;

/// A batch of rows to insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    rows: Vec<Row>,
}

impl Rows {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push(&mut self, row: impl Into<Row>) -> &mut Self {
        self.rows.push(row.into());
        self
    }

    /// Build a batch from anything that converts to rows (e.g. derived models).
    pub fn from_models<T: ToRow>(models: &[T]) -> Self {
        models.iter().map(ToRow::to_row).collect()
    }

    /// Build a batch from a JSON object (one row) or an array of objects.
    pub fn from_json(value: serde_json::Value) -> OrmResult<Self> {
        match value {
            serde_json::Value::Array(items) => items.into_iter().map(Row::from_json).collect(),
            obj @ serde_json::Value::Object(_) => Ok(Row::from_json(obj)?.into()),
            other => Err(OrmError::validation(format!(
                "Rows must be a JSON object or an array of objects, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// The first row of the batch.
    pub fn first_row(&self) -> OrmResult<&Row> {
        self.rows
            .first()
            .ok_or_else(|| OrmError::validation("Empty data."))
    }

    /// Column names of the batch, in the first row's order.
    pub fn columns(&self) -> OrmResult<Vec<&str>> {
        let first = self.first_row()?;
        if first.is_empty() {
            return Err(OrmError::validation("Empty array."));
        }
        Ok(first.columns().collect())
    }

    /// Check that every row has exactly the first row's columns.
    pub fn validate(&self) -> OrmResult<()> {
        let columns = self.columns()?;
        for (i, row) in self.rows.iter().enumerate().skip(1) {
            if row.len() != columns.len() {
                return Err(OrmError::validation(format!(
                    "Row {i} has {} columns, expected {} ({})",
                    row.len(),
                    columns.len(),
                    columns.join(", ")
                )));
            }
            if let Some(missing) = columns.iter().find(|c| !row.has_column(c)) {
                return Err(OrmError::validation(format!(
                    "Row {i} is missing column '{missing}'"
                )));
            }
        }
        Ok(())
    }

    /// Flatten all values row by row, aligned with [`Rows::columns`].
    ///
    /// Rows whose columns are in a different order than the first row are
    /// re-ordered. Call [`Rows::validate`] first; a missing column here
    /// becomes `NULL`.
    pub fn inline_values(&self) -> Vec<Value> {
        let Some(first) = self.rows.first() else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(first.len() * self.rows.len());
        out.extend(first.values().cloned());
        for row in &self.rows[1..] {
            if row.columns().eq(first.columns()) {
                out.extend(row.values().cloned());
            } else {
                out.extend(
                    first
                        .columns()
                        .map(|c| row.get(c).cloned().unwrap_or(Value::Null)),
                );
            }
        }
        out
    }

    /// Consume the batch and flatten it (same order as [`Rows::inline_values`]).
    pub fn into_inline_values(self) -> Vec<Value> {
        let mut iter = self.rows.into_iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };
        let columns: Vec<String> = first.columns().map(str::to_string).collect();
        let mut out = Vec::with_capacity(columns.len() * (iter.len() + 1));
        out.extend(first.into_entries().into_iter().map(|(_, v)| v));
        for row in iter {
            if row.columns().eq(columns.iter().map(String::as_str)) {
                out.extend(row.into_entries().into_iter().map(|(_, v)| v));
            } else {
                let mut entries = row.into_entries();
                for column in &columns {
                    let value = entries
                        .iter()
                        .position(|(c, _)| c == column)
                        .map(|pos| entries.swap_remove(pos).1)
                        .unwrap_or(Value::Null);
                    out.push(value);
                }
            }
        }
        out
    }
}

impl From<Row> for Rows {
    fn from(row: Row) -> Self {
        Self { rows: vec![row] }
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl<const N: usize> From<[Row; N]> for Rows {
    fn from(rows: [Row; N]) -> Self {
        Self {
            rows: rows.into(),
        }
    }
}

impl FromIterator<Row> for Rows {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
