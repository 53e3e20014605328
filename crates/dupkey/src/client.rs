//! Generic client trait for running bulk statements.
//!
//! A client knows three things the statement builders need: which
//! [`Driver`] it talks to, the table prefix applied to every table name, and
//! how to run a statement with positional parameters and report the number of
//! affected rows.

use crate::driver::Driver;
use crate::error::{OrmError, OrmResult};
use crate::monitor::{QueryEvent, TracingSqlHook};
use crate::value::Value;
use std::time::Instant;

#[cfg(not(any(feature = "mysql", feature = "sqlite")))]
compile_error!("dupkey needs at least one of the `mysql` or `sqlite` features");

/// A connection that can run affecting statements.
///
/// Implemented by [`MySqlClient`], [`SqliteClient`] and [`Client`]. Tests and
/// dry runs can implement it to capture statements instead of running them.
pub trait GenericClient: Send + Sync {
    /// The driver (and therefore SQL dialect) behind this connection.
    fn driver(&self) -> Driver;

    /// Prefix prepended to every table name.
    fn table_prefix(&self) -> &str {
        ""
    }

    /// Execute a statement and return the number of affected rows.
    fn affecting_statement(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Execute a statement, associating a tag for logging.
    ///
    /// The default implementation ignores `tag` and calls
    /// [`GenericClient::affecting_statement`].
    fn affecting_statement_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        let _ = tag;
        self.affecting_statement(sql, params)
    }
}

/// Bind a [`Value`] onto a sqlx query as the next positional parameter.
macro_rules! bind_value {
    ($query:expr, $value:expr) => {
        match $value {
            Value::Null => $query.bind(None::<String>),
            Value::Bool(v) => $query.bind(*v),
            Value::Int(v) => $query.bind(*v),
            Value::Float(v) => $query.bind(*v),
            Value::Text(v) => $query.bind(v.as_str()),
            Value::Bytes(v) => $query.bind(v.as_slice()),
            Value::Json(v) => $query.bind(sqlx::types::Json(v)),
            Value::Uuid(v) => $query.bind(*v),
            Value::Date(v) => $query.bind(*v),
            Value::DateTime(v) => $query.bind(*v),
        }
    };
}

/// Run `sql` on a sqlx pool and report it to the hook.
macro_rules! run_on_pool {
    ($self:ident, $tag:expr, $sql:expr, $params:expr) => {{
        let started = Instant::now();
        let mut query = sqlx::query($sql);
        for value in $params {
            query = bind_value!(query, value);
        }
        let result = query
            .execute(&$self.pool)
            .await
            .map(|done| done.rows_affected())
            .map_err(OrmError::from_db_error);

        $self.hook.on_query(&QueryEvent {
            tag: $tag,
            driver: $self.driver(),
            sql: $sql,
            param_count: $params.len(),
            duration: started.elapsed(),
            outcome: result.as_ref().copied().map_err(ToString::to_string),
        });
        result
    }};
}

// ==================== MySQL ====================

#[cfg(feature = "mysql")]
pub use self::mysql::MySqlClient;

#[cfg(feature = "mysql")]
mod mysql {
    use super::*;
    use sqlx::MySqlPool;

    /// MySQL / MariaDB client over a sqlx pool.
    #[derive(Debug, Clone)]
    pub struct MySqlClient {
        pool: MySqlPool,
        table_prefix: String,
        hook: TracingSqlHook,
    }

    impl MySqlClient {
        pub fn new(pool: MySqlPool) -> Self {
            Self {
                pool,
                table_prefix: String::new(),
                hook: TracingSqlHook::default(),
            }
        }

        /// Set the prefix prepended to every table name.
        pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
            self.table_prefix = prefix.into();
            self
        }

        /// Replace the SQL logging hook.
        pub fn with_sql_hook(mut self, hook: TracingSqlHook) -> Self {
            self.hook = hook;
            self
        }

        pub fn pool(&self) -> &MySqlPool {
            &self.pool
        }
    }

    impl GenericClient for MySqlClient {
        fn driver(&self) -> Driver {
            Driver::Mysql
        }

        fn table_prefix(&self) -> &str {
            &self.table_prefix
        }

        async fn affecting_statement(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
            run_on_pool!(self, "-", sql, params)
        }

        async fn affecting_statement_tagged(
            &self,
            tag: &str,
            sql: &str,
            params: &[Value],
        ) -> OrmResult<u64> {
            run_on_pool!(self, tag, sql, params)
        }
    }
}

// ==================== SQLite ====================

#[cfg(feature = "sqlite")]
pub use self::sqlite::SqliteClient;

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use sqlx::SqlitePool;

    /// SQLite client over a sqlx pool.
    #[derive(Debug, Clone)]
    pub struct SqliteClient {
        pool: SqlitePool,
        table_prefix: String,
        hook: TracingSqlHook,
    }

    impl SqliteClient {
        pub fn new(pool: SqlitePool) -> Self {
            Self {
                pool,
                table_prefix: String::new(),
                hook: TracingSqlHook::default(),
            }
        }

        /// Set the prefix prepended to every table name.
        pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
            self.table_prefix = prefix.into();
            self
        }

        /// Replace the SQL logging hook.
        pub fn with_sql_hook(mut self, hook: TracingSqlHook) -> Self {
            self.hook = hook;
            self
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }
    }

    impl GenericClient for SqliteClient {
        fn driver(&self) -> Driver {
            Driver::Sqlite
        }

        fn table_prefix(&self) -> &str {
            &self.table_prefix
        }

        async fn affecting_statement(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
            run_on_pool!(self, "-", sql, params)
        }

        async fn affecting_statement_tagged(
            &self,
            tag: &str,
            sql: &str,
            params: &[Value],
        ) -> OrmResult<u64> {
            run_on_pool!(self, tag, sql, params)
        }
    }
}

// ==================== Client ====================

/// A client for whichever driver the configuration selected.
///
/// Returned by [`crate::connect`].
#[derive(Debug, Clone)]
pub enum Client {
    #[cfg(feature = "mysql")]
    MySql(MySqlClient),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteClient),
}

impl GenericClient for Client {
    fn driver(&self) -> Driver {
        match self {
            #[cfg(feature = "mysql")]
            Client::MySql(c) => c.driver(),
            #[cfg(feature = "sqlite")]
            Client::Sqlite(c) => c.driver(),
        }
    }

    fn table_prefix(&self) -> &str {
        match self {
            #[cfg(feature = "mysql")]
            Client::MySql(c) => c.table_prefix(),
            #[cfg(feature = "sqlite")]
            Client::Sqlite(c) => c.table_prefix(),
        }
    }

    async fn affecting_statement(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        match self {
            #[cfg(feature = "mysql")]
            Client::MySql(c) => c.affecting_statement(sql, params).await,
            #[cfg(feature = "sqlite")]
            Client::Sqlite(c) => c.affecting_statement(sql, params).await,
        }
    }

    async fn affecting_statement_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[Value],
    ) -> OrmResult<u64> {
        match self {
            #[cfg(feature = "mysql")]
            Client::MySql(c) => c.affecting_statement_tagged(tag, sql, params).await,
            #[cfg(feature = "sqlite")]
            Client::Sqlite(c) => c.affecting_statement_tagged(tag, sql, params).await,
        }
    }
}

#[cfg(feature = "mysql")]
impl From<MySqlClient> for Client {
    fn from(c: MySqlClient) -> Self {
        Client::MySql(c)
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteClient> for Client {
    fn from(c: SqliteClient) -> Self {
        Client::Sqlite(c)
    }
}
