//! Model metadata and the bulk write entry points.
//!
//! Any type implementing [`Model`] gets the [`BulkWrite`] operations:
//!
//! ```ignore
//! use dupkey::{BulkWrite, Model, Row};
//!
//! #[derive(Model)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     uuid: String,
//!     email: String,
//! }
//!
//! let rows = vec![
//!     Row::new().set("uuid", "a").set("email", "a@example.com"),
//!     Row::new().set("uuid", "b").set("email", "b@example.com"),
//! ];
//! let affected = User::insert_on_duplicate_key(&client, rows, Some(&["email"])).await?;
//! ```
//!
//! For tables without a model type use [`table`]:
//!
//! ```ignore
//! dupkey::table("audit_log").insert_ignore(&client, rows).await?;
//! ```

use crate::batch::Rows;
use crate::client::GenericClient;
use crate::error::OrmResult;
use crate::statement::{Statement, StatementBuilder, StatementKind};
use std::future::Future;

/// Table metadata for a model type.
pub trait Model {
    /// Table name without the connection's prefix.
    const TABLE: &'static str;

    /// Primary key column (used as the SQLite upsert conflict target).
    const PRIMARY_KEY: &'static str = "id";
}

/// Start a bulk write against a table by name.
pub fn table(name: impl Into<String>) -> TableWriter {
    TableWriter {
        table: name.into(),
        primary_key: vec!["id".to_string()],
    }
}

/// Bulk writes against one table.
///
/// Created via [`table`] or [`BulkWrite::writer`].
#[derive(Debug, Clone)]
#[must_use]
pub struct TableWriter {
    table: String,
    primary_key: Vec<String>,
}

impl TableWriter {
    /// Set the primary key column(s). Defaults to `id`.
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Table name without prefix.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// A statement builder for this table on `conn`'s driver and prefix.
    pub fn builder(&self, conn: &impl GenericClient) -> OrmResult<StatementBuilder> {
        Ok(
            StatementBuilder::new(conn.driver(), conn.table_prefix(), &self.table)?
                .conflict_key(self.primary_key.iter().cloned()),
        )
    }

    /// Build the statement for `kind`, or `None` when there is nothing to insert.
    pub(crate) fn prepare(
        &self,
        conn: &impl GenericClient,
        kind: StatementKind,
        rows: Rows,
        update_columns: Option<&[&str]>,
    ) -> OrmResult<Option<Statement>> {
        if rows.is_empty() {
            tracing::debug!(
                target: "dupkey.sql",
                kind = kind.as_str(),
                table = %self.table,
                "empty batch, nothing to insert"
            );
            return Ok(None);
        }
        let builder = self.builder(conn)?;
        let stmt = match kind {
            StatementKind::InsertOnDuplicateKey => {
                builder.insert_on_duplicate(rows, update_columns)?
            }
            StatementKind::InsertIgnore => builder.insert_ignore(rows)?,
            StatementKind::Replace => builder.replace(rows)?,
        };
        Ok(Some(stmt))
    }

    /// `INSERT ... ON DUPLICATE KEY UPDATE`.
    ///
    /// `update_columns` of `None` or empty updates every inserted column.
    /// Returns the affected-row count (MySQL: 1 per inserted row, 2 per updated
    /// row, 0 per unchanged row). An empty batch returns `0` without a query.
    pub async fn insert_on_duplicate_key(
        &self,
        conn: &impl GenericClient,
        rows: impl Into<Rows>,
        update_columns: Option<&[&str]>,
    ) -> OrmResult<u64> {
        let stmt = self.prepare(
            conn,
            StatementKind::InsertOnDuplicateKey,
            rows.into(),
            update_columns,
        )?;
        run(stmt, conn).await
    }

    /// `INSERT IGNORE` (`INSERT OR IGNORE` on SQLite).
    ///
    /// Returns the number of rows actually inserted.
    pub async fn insert_ignore(
        &self,
        conn: &impl GenericClient,
        rows: impl Into<Rows>,
    ) -> OrmResult<u64> {
        let stmt = self.prepare(conn, StatementKind::InsertIgnore, rows.into(), None)?;
        run(stmt, conn).await
    }

    /// `REPLACE INTO`.
    ///
    /// Returns the affected-row count; on MySQL a replaced row counts twice
    /// (delete + insert).
    pub async fn replace(
        &self,
        conn: &impl GenericClient,
        rows: impl Into<Rows>,
    ) -> OrmResult<u64> {
        let stmt = self.prepare(conn, StatementKind::Replace, rows.into(), None)?;
        run(stmt, conn).await
    }
}

async fn run(stmt: Option<Statement>, conn: &impl GenericClient) -> OrmResult<u64> {
    match stmt {
        Some(stmt) => stmt.execute(conn).await,
        None => Ok(0),
    }
}

/// Bulk insert operations for every [`Model`].
pub trait BulkWrite: Model {
    /// Table name without prefix.
    fn table_name() -> &'static str {
        Self::TABLE
    }

    /// Primary key column.
    fn primary_key() -> &'static str {
        Self::PRIMARY_KEY
    }

    /// The table prefix of `conn`.
    fn table_prefix(conn: &impl GenericClient) -> &str {
        conn.table_prefix()
    }

    /// The driver name of `conn` (`mysql` / `sqlite`).
    fn driver_name(conn: &impl GenericClient) -> &'static str {
        conn.driver().name()
    }

    /// A [`TableWriter`] for this model's table and primary key.
    fn writer() -> TableWriter {
        table(Self::TABLE).primary_key([Self::PRIMARY_KEY])
    }

    /// See [`TableWriter::insert_on_duplicate_key`].
    fn insert_on_duplicate_key(
        conn: &impl GenericClient,
        rows: impl Into<Rows>,
        update_columns: Option<&[&str]>,
    ) -> impl Future<Output = OrmResult<u64>> + Send {
        let stmt = Self::writer().prepare(
            conn,
            StatementKind::InsertOnDuplicateKey,
            rows.into(),
            update_columns,
        );
        async move { run(stmt?, conn).await }
    }

    /// See [`TableWriter::insert_ignore`].
    fn insert_ignore(
        conn: &impl GenericClient,
        rows: impl Into<Rows>,
    ) -> impl Future<Output = OrmResult<u64>> + Send {
        let stmt = Self::writer().prepare(conn, StatementKind::InsertIgnore, rows.into(), None);
        async move { run(stmt?, conn).await }
    }

    /// See [`TableWriter::replace`].
    fn replace(
        conn: &impl GenericClient,
        rows: impl Into<Rows>,
    ) -> impl Future<Output = OrmResult<u64>> + Send {
        let stmt = Self::writer().prepare(conn, StatementKind::Replace, rows.into(), None);
        async move { run(stmt?, conn).await }
    }
}

impl<T: Model> BulkWrite for T {}
