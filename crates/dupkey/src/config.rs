//! Connection configuration loaded from TOML.
//!
//! ```toml
//! driver = "mysql"
//! url = "${DATABASE_URL}"
//! table_prefix = "prefix_"
//! max_connections = 5
//!
//! [log]
//! level = "debug"
//! max_sql_length = 200
//! ```
//!
//! `${VAR}` references in `url` and `table_prefix` are expanded from the
//! environment.

use crate::driver::Driver;
use crate::error::{OrmError, OrmResult};
use crate::monitor::TracingSqlHook;
use serde::Deserialize;
use std::path::Path;
use tracing::Level;

/// How to reach the database and how to name its tables.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectConfig {
    pub driver: Driver,
    pub url: String,
    #[serde(default)]
    pub table_prefix: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub log: LogConfig,
}

/// SQL logging settings (see [`TracingSqlHook`]).
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// `0` disables truncation.
    #[serde(default = "default_max_sql_length")]
    pub max_sql_length: usize,
}

fn default_max_connections() -> u32 {
    5
}

fn default_level() -> String {
    "debug".to_string()
}

fn default_max_sql_length() -> usize {
    200
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            max_sql_length: default_max_sql_length(),
        }
    }
}

impl LogConfig {
    /// Build the SQL hook described by this config.
    pub fn hook(&self) -> OrmResult<TracingSqlHook> {
        let level: Level = self
            .level
            .parse()
            .map_err(|_| OrmError::config(format!("invalid log.level: {}", self.level)))?;
        let hook = TracingSqlHook::new().level(level);
        Ok(match self.max_sql_length {
            0 => hook.no_truncate(),
            n => hook.max_sql_length(n),
        })
    }
}

impl ConnectConfig {
    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrmError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            OrmError::Config(msg) => {
                OrmError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse a TOML config, expand `${VAR}` references and validate it.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        let mut config: ConnectConfig = toml::from_str(raw)?;
        config.expand_env()?;
        config.validate()?;
        Ok(config)
    }

    fn expand_env(&mut self) -> OrmResult<()> {
        self.url = expand_env_vars(&self.url)?;
        self.table_prefix = expand_env_vars(&self.table_prefix)?;
        Ok(())
    }

    fn validate(&self) -> OrmResult<()> {
        if self.url.trim().is_empty() {
            return Err(OrmError::config("url must not be empty"));
        }
        if self.max_connections == 0 {
            return Err(OrmError::config("max_connections must be greater than 0"));
        }
        self.log.hook()?;
        Ok(())
    }
}

fn expand_env_vars(input: &str) -> OrmResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(OrmError::config(format!(
                    "unterminated env var reference: ${{{key}}}"
                )));
            }
            if key.is_empty() {
                return Err(OrmError::config("invalid env var reference: ${}"));
            }

            let v = std::env::var(&key).map_err(|_| {
                OrmError::config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = ConnectConfig::from_toml_str(
            r#"
driver = "sqlite"
url = "sqlite::memory:"
"#,
        )
        .unwrap();
        assert_eq!(config.driver, Driver::Sqlite);
        assert_eq!(config.table_prefix, "");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.max_sql_length, 200);
    }

    #[test]
    fn parses_full_config() {
        let config = ConnectConfig::from_toml_str(
            r#"
driver = "mariadb"
url = "mysql://root@localhost/app"
table_prefix = "prefix_"
max_connections = 2

[log]
level = "info"
max_sql_length = 0
"#,
        )
        .unwrap();
        assert_eq!(config.driver, Driver::Mysql);
        assert_eq!(config.table_prefix, "prefix_");
        let hook = config.log.hook().unwrap();
        assert_eq!(hook.level, Level::INFO);
        assert_eq!(hook.max_sql_length, None);
    }

    #[test]
    fn rejects_unknown_driver() {
        let err = ConnectConfig::from_toml_str("driver = \"pgsql\"\nurl = \"x\"\n").unwrap_err();
        assert!(matches!(err, OrmError::Config(_)));
    }

    #[test]
    fn rejects_empty_url_and_zero_pool() {
        assert!(ConnectConfig::from_toml_str("driver = \"sqlite\"\nurl = \" \"\n").is_err());
        assert!(
            ConnectConfig::from_toml_str(
                "driver = \"sqlite\"\nurl = \"sqlite::memory:\"\nmax_connections = 0\n"
            )
            .is_err()
        );
    }

    #[test]
    fn rejects_bad_log_level() {
        let err = ConnectConfig::from_toml_str(
            "driver = \"sqlite\"\nurl = \"sqlite::memory:\"\n[log]\nlevel = \"loud\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("log.level"));
    }

    #[test]
    fn expands_env_vars() {
        // PATH is set in every test environment.
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_env_vars("a${PATH}b").unwrap(), format!("a{path}b"));
        assert_eq!(expand_env_vars("plain").unwrap(), "plain");
        assert!(expand_env_vars("${UNTERMINATED").is_err());
        assert!(expand_env_vars("${}").is_err());
        assert!(expand_env_vars("${DUPKEY_SURELY_NOT_SET_123}").is_err());
    }
}
