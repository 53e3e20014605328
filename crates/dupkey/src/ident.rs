//! Backtick-quoted SQL identifiers.
//!
//! MySQL and SQLite both accept `` `name` `` as a quoted identifier. Every
//! table and column that ends up in a generated statement goes through
//! [`Ident`], which quotes each segment and doubles embedded backticks.
//!
//! - Segments must be non-empty and must not contain NUL
//! - Table names may be dotted (`schema.table`); column names may not
//!
//! # Example
//! ```
//! use dupkey::Ident;
//!
//! let t = Ident::table("prefix_", "analytics.users")?;
//! assert_eq!(t.to_sql(), "`analytics`.`prefix_users`");
//! # Ok::<(), dupkey::OrmError>(())
//! ```

use crate::error::{OrmError, OrmResult};

/// A SQL identifier made of one or more segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<String>,
}

fn check_segment(segment: &str, what: &str) -> OrmResult<()> {
    if segment.is_empty() {
        return Err(OrmError::validation(format!("Empty {what} identifier")));
    }
    if segment.contains('\0') {
        return Err(OrmError::validation(format!(
            "{what} identifier cannot contain NUL character"
        )));
    }
    Ok(())
}

impl Ident {
    /// A single column identifier.
    pub fn column(name: &str) -> OrmResult<Self> {
        check_segment(name, "column")?;
        Ok(Self {
            parts: vec![name.to_string()],
        })
    }

    /// A table identifier with the connection's table prefix applied.
    ///
    /// The prefix goes in front of the last segment, so `db.users` with prefix
    /// `p_` becomes `` `db`.`p_users` ``.
    pub fn table(prefix: &str, name: &str) -> OrmResult<Self> {
        if name.is_empty() {
            return Err(OrmError::validation("Table name cannot be empty"));
        }
        let mut parts: Vec<String> = Vec::new();
        for segment in name.split('.') {
            check_segment(segment, "table")?;
            parts.push(segment.to_string());
        }
        if let Some(last) = parts.last_mut() {
            last.insert_str(0, prefix);
        }
        Ok(Self { parts })
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        // segments + surrounding backticks + dots
        let cap = self.parts.iter().map(|p| p.len() + 3).sum();
        let mut out = String::with_capacity(cap);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            push_quoted(out, part);
        }
    }
}

/// Append a single backtick-quoted segment.
pub(crate) fn push_quoted(out: &mut String, name: &str) {
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push('`');
        }
        out.push(ch);
    }
    out.push('`');
}
