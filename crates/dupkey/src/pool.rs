//! Connection pool utilities

use crate::client::Client;
use crate::config::ConnectConfig;
use crate::driver::Driver;
use crate::error::{OrmError, OrmResult};

/// Open a pooled client for the configured driver.
///
/// # Example
///
/// ```ignore
/// let config = dupkey::ConnectConfig::load("dupkey.toml")?;
/// let client = dupkey::connect(&config).await?;
/// ```
pub async fn connect(config: &ConnectConfig) -> OrmResult<Client> {
    let hook = config.log.hook()?;
    tracing::debug!(
        target: "dupkey.pool",
        driver = %config.driver,
        max_connections = config.max_connections,
        "connecting"
    );

    match config.driver {
        #[cfg(feature = "mysql")]
        Driver::Mysql => {
            let pool = sqlx::mysql::MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.url)
                .await
                .map_err(|e| OrmError::Connection(e.to_string()))?;
            Ok(crate::client::MySqlClient::new(pool)
                .with_table_prefix(config.table_prefix.clone())
                .with_sql_hook(hook)
                .into())
        }
        #[cfg(feature = "sqlite")]
        Driver::Sqlite => {
            let pool = sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.url)
                .await
                .map_err(|e| OrmError::Connection(e.to_string()))?;
            Ok(crate::client::SqliteClient::new(pool)
                .with_table_prefix(config.table_prefix.clone())
                .with_sql_hook(hook)
                .into())
        }
        #[allow(unreachable_patterns)]
        other => Err(OrmError::UnsupportedDriver(format!(
            "{other} (compiled without the `{other}` feature)"
        ))),
    }
}
