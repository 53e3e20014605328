//! # dupkey
//!
//! Bulk `INSERT ... ON DUPLICATE KEY UPDATE`, `INSERT IGNORE` and `REPLACE INTO`
//! for MySQL and SQLite.
//!
//! ## Features
//!
//! - **Three statement flavors** built from batches of ordered rows
//! - **One placeholder group per row**: `(?,?,?), (?,?,?)` with params flattened row by row
//! - **Dialect aware**: `INSERT OR IGNORE` and `ON CONFLICT ... DO UPDATE` on SQLite
//! - **Table prefixes** come from the connection, table names from the model
//! - **SQL logging** through `tracing` (target `dupkey.sql`)
//!
//! ## Example
//!
//! ```ignore
//! use dupkey::{BulkWrite, Model, Row};
//!
//! #[derive(Model)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     id: i64,
//!     email: String,
//!     name: String,
//! }
//!
//! let config = dupkey::ConnectConfig::load("dupkey.toml")?;
//! let client = dupkey::connect(&config).await?;
//!
//! let rows = vec![
//!     Row::new().set("id", 1).set("email", "user1@email.com").set("name", "User One"),
//!     Row::new().set("id", 2).set("email", "user2@email.com").set("name", "User Two"),
//! ];
//!
//! // Update only `name` when the row already exists.
//! User::insert_on_duplicate_key(&client, rows, Some(&["name"])).await?;
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod ident;
pub mod model;
pub mod monitor;
pub mod pool;
pub mod row;
pub mod statement;
pub mod value;

pub use batch::Rows;
pub use client::{Client, GenericClient};
pub use config::{ConnectConfig, LogConfig};
pub use driver::Driver;
pub use error::{OrmError, OrmResult};
pub use ident::Ident;
pub use model::{BulkWrite, Model, TableWriter, table};
pub use monitor::{QueryEvent, TracingSqlHook};
pub use pool::connect;
pub use row::{Row, ToRow};
pub use statement::{
    Statement, StatementBuilder, StatementKind, column_list, excluded_list, question_marks,
    values_list,
};
pub use value::Value;

#[cfg(feature = "mysql")]
pub use client::MySqlClient;

#[cfg(feature = "sqlite")]
pub use client::SqliteClient;

#[cfg(feature = "derive")]
pub use dupkey_derive::{Model, ToRow};
