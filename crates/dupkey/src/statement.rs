//! Bulk INSERT statement builders.
//!
//! Three statement flavors are produced from a [`Rows`] batch:
//!
//! ```text
//! INSERT INTO `prefix_users`(`id`,`email`) VALUES
//! (?,?), (?,?)
//! ON DUPLICATE KEY UPDATE `id` = VALUES(`id`), `email` = VALUES(`email`)
//!
//! INSERT IGNORE INTO `prefix_users`(`id`,`email`) VALUES
//! (?,?), (?,?)
//!
//! REPLACE INTO `prefix_users`(`id`,`email`) VALUES
//! (?,?), (?,?)
//! ```
//!
//! SQLite spells the IGNORE flavor `INSERT OR IGNORE` and has no
//! `ON DUPLICATE KEY`; its upsert uses `ON CONFLICT(<key>) DO UPDATE SET`
//! with `excluded.<col>` instead of `VALUES(<col>)`.

use crate::batch::Rows;
use crate::client::GenericClient;
use crate::driver::Driver;
use crate::error::{OrmError, OrmResult};
use crate::ident::{Ident, push_quoted};
use crate::value::Value;
use std::collections::HashSet;
use std::fmt;

/// Which bulk statement flavor a [`Statement`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `INSERT ... ON DUPLICATE KEY UPDATE` (or SQLite `ON CONFLICT DO UPDATE`)
    InsertOnDuplicateKey,
    /// `INSERT IGNORE` / `INSERT OR IGNORE`
    InsertIgnore,
    /// `REPLACE INTO`
    Replace,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsertOnDuplicateKey => "insert_on_duplicate_key",
            Self::InsertIgnore => "insert_ignore",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ready-to-run statement: SQL with `?` placeholders plus positional params.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub driver: Driver,
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// Execute the statement, returning the affected-row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> OrmResult<u64> {
        if conn.driver() != self.driver {
            return Err(OrmError::validation(format!(
                "Statement was built for {} but the connection is {}",
                self.driver,
                conn.driver()
            )));
        }
        conn.affecting_statement_tagged(self.kind.as_str(), &self.sql, &self.params)
            .await
    }
}

/// Quoted, comma-separated column list: `` `id`,`email`,`name` ``.
pub fn column_list<S: AsRef<str>>(columns: &[S]) -> OrmResult<String> {
    if columns.is_empty() {
        return Err(OrmError::validation("Empty array."));
    }
    let mut out = String::with_capacity(columns.iter().map(|c| c.as_ref().len() + 3).sum());
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        Ident::column(column.as_ref())?.write_sql(&mut out);
    }
    Ok(out)
}

/// One `(?,?,...)` group per row, groups joined by `", "`.
pub fn question_marks(rows: &Rows) -> String {
    let groups: Vec<String> = rows
        .iter()
        .map(|row| format!("({})", vec!["?"; row.len()].join(",")))
        .collect();
    groups.join(", ")
}

/// MySQL update list: `` `id` = VALUES(`id`), `name` = VALUES(`name`) ``.
pub fn values_list<S: AsRef<str>>(columns: &[S]) -> OrmResult<String> {
    assignment_list(columns, |out, col| {
        out.push_str("VALUES(");
        push_quoted(out, col);
        out.push(')');
    })
}

/// SQLite update list: `` `id` = excluded.`id`, `name` = excluded.`name` ``.
pub fn excluded_list<S: AsRef<str>>(columns: &[S]) -> OrmResult<String> {
    assignment_list(columns, |out, col| {
        out.push_str("excluded.");
        push_quoted(out, col);
    })
}

fn assignment_list<S: AsRef<str>>(
    columns: &[S],
    rhs: impl Fn(&mut String, &str),
) -> OrmResult<String> {
    let mut out = String::new();
    for (i, column) in columns.iter().enumerate() {
        let column = column.as_ref();
        if i > 0 {
            out.push_str(", ");
        }
        Ident::column(column)?.write_sql(&mut out);
        out.push_str(" = ");
        rhs(&mut out, column);
    }
    Ok(out)
}

/// Builds bulk statements for one table on one driver.
///
/// # Example
/// ```
/// use dupkey::{Driver, Row, StatementBuilder};
///
/// let builder = StatementBuilder::new(Driver::Mysql, "prefix_", "users")?;
/// let stmt = builder.replace(Row::new().set("id", 1).set("name", "One"))?;
/// assert_eq!(stmt.sql, "REPLACE INTO `prefix_users`(`id`,`name`) VALUES\n(?,?)");
/// # Ok::<(), dupkey::OrmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    driver: Driver,
    table: Ident,
    conflict_key: Vec<String>,
}

impl StatementBuilder {
    /// Create a builder; `prefix` is the connection's table prefix.
    pub fn new(driver: Driver, prefix: &str, table: &str) -> OrmResult<Self> {
        Ok(Self {
            driver,
            table: Ident::table(prefix, table)?,
            conflict_key: vec!["id".to_string()],
        })
    }

    /// Columns of the unique key used as the SQLite `ON CONFLICT` target.
    ///
    /// Defaults to `id`. MySQL resolves duplicates against every unique key and
    /// ignores this.
    pub fn conflict_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflict_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// The prefixed, quoted table name.
    pub fn table_sql(&self) -> String {
        self.table.to_sql()
    }

    fn head(&self, keyword: &str, rows: &Rows) -> OrmResult<String> {
        rows.validate()?;
        let columns = rows.columns()?;
        let mut sql = String::with_capacity(64 + rows.len() * (columns.len() * 2 + 4));
        sql.push_str(keyword);
        sql.push_str(" INTO ");
        self.table.write_sql(&mut sql);
        sql.push('(');
        sql.push_str(&column_list(columns.as_slice())?);
        sql.push_str(") VALUES\n");
        sql.push_str(&question_marks(rows));
        Ok(sql)
    }

    /// SQL for `INSERT ... ON DUPLICATE KEY UPDATE`.
    ///
    /// `update_columns` of `None` or empty updates every inserted column.
    pub fn insert_on_duplicate_sql(
        &self,
        rows: &Rows,
        update_columns: Option<&[&str]>,
    ) -> OrmResult<String> {
        let mut sql = self.head("INSERT", rows)?;
        let columns = rows.columns()?;
        let updates: &[&str] = match update_columns {
            Some(cols) if !cols.is_empty() => {
                check_update_columns(cols, rows)?;
                cols
            }
            _ => columns.as_slice(),
        };

        match self.driver {
            Driver::Mysql => {
                sql.push_str("\nON DUPLICATE KEY UPDATE ");
                sql.push_str(&values_list(updates)?);
            }
            Driver::Sqlite => {
                if self.conflict_key.is_empty() {
                    return Err(OrmError::validation("SQLite upsert requires a conflict key"));
                }
                sql.push_str("\nON CONFLICT(");
                sql.push_str(&column_list(self.conflict_key.as_slice())?);
                sql.push_str(") DO UPDATE SET ");
                sql.push_str(&excluded_list(updates)?);
            }
        }
        Ok(sql)
    }

    /// SQL for `INSERT IGNORE` (`INSERT OR IGNORE` on SQLite).
    pub fn insert_ignore_sql(&self, rows: &Rows) -> OrmResult<String> {
        self.head(self.driver.insert_ignore_keyword(), rows)
    }

    /// SQL for `REPLACE INTO`.
    pub fn replace_sql(&self, rows: &Rows) -> OrmResult<String> {
        self.head("REPLACE", rows)
    }

    /// Build an `INSERT ... ON DUPLICATE KEY UPDATE` statement.
    pub fn insert_on_duplicate(
        &self,
        rows: impl Into<Rows>,
        update_columns: Option<&[&str]>,
    ) -> OrmResult<Statement> {
        let rows = rows.into();
        let sql = self.insert_on_duplicate_sql(&rows, update_columns)?;
        Ok(self.statement(StatementKind::InsertOnDuplicateKey, sql, rows))
    }

    /// Build an `INSERT IGNORE` statement.
    pub fn insert_ignore(&self, rows: impl Into<Rows>) -> OrmResult<Statement> {
        let rows = rows.into();
        let sql = self.insert_ignore_sql(&rows)?;
        Ok(self.statement(StatementKind::InsertIgnore, sql, rows))
    }

    /// Build a `REPLACE INTO` statement.
    pub fn replace(&self, rows: impl Into<Rows>) -> OrmResult<Statement> {
        let rows = rows.into();
        let sql = self.replace_sql(&rows)?;
        Ok(self.statement(StatementKind::Replace, sql, rows))
    }

    fn statement(&self, kind: StatementKind, sql: String, rows: Rows) -> Statement {
        Statement {
            kind,
            driver: self.driver,
            sql,
            params: rows.into_inline_values(),
        }
    }
}

fn check_update_columns(cols: &[&str], rows: &Rows) -> OrmResult<()> {
    let first = rows.first_row()?;
    let mut seen = HashSet::with_capacity(cols.len());
    for col in cols {
        if !seen.insert(*col) {
            return Err(OrmError::validation(format!(
                "Duplicate update column '{col}'"
            )));
        }
        if !first.has_column(col) {
            return Err(OrmError::validation(format!(
                "Update column '{col}' is not one of the inserted columns"
            )));
        }
    }
    Ok(())
}
