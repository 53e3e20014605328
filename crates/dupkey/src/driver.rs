//! SQL dialects supported by the statement builders.

use crate::error::{OrmError, OrmResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Database driver behind a connection.
///
/// The driver decides the single dialect difference between MySQL and SQLite
/// bulk inserts: how "insert, skipping duplicates" is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// MySQL and MariaDB
    #[serde(alias = "mariadb")]
    Mysql,
    /// SQLite 3
    #[serde(alias = "sqlite3")]
    Sqlite,
}

impl Driver {
    /// Parse a driver name (case-insensitive).
    ///
    /// `mariadb` is accepted as an alias for MySQL and `sqlite3` for SQLite,
    /// the same names the config file accepts.
    pub fn from_name(name: &str) -> OrmResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(OrmError::UnsupportedDriver(name.to_string())),
        }
    }

    /// Canonical driver name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Leading keywords of an "insert, skipping duplicates" statement.
    pub fn insert_ignore_keyword(&self) -> &'static str {
        match self {
            Self::Mysql => "INSERT IGNORE",
            Self::Sqlite => "INSERT OR IGNORE",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Driver {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(Driver::from_name("mysql").unwrap(), Driver::Mysql);
        assert_eq!(Driver::from_name("MySQL").unwrap(), Driver::Mysql);
        assert_eq!(Driver::from_name("mariadb").unwrap(), Driver::Mysql);
        assert_eq!("sqlite".parse::<Driver>().unwrap(), Driver::Sqlite);
        assert_eq!("SQLite3".parse::<Driver>().unwrap(), Driver::Sqlite);
    }

    #[test]
    fn config_names_match_from_name() {
        #[derive(Deserialize)]
        struct Conn {
            driver: Driver,
        }

        for name in ["mysql", "mariadb", "sqlite", "sqlite3"] {
            let conn: Conn = toml::from_str(&format!("driver = \"{name}\"")).unwrap();
            assert_eq!(conn.driver, Driver::from_name(name).unwrap(), "{name}");
        }
    }

    #[test]
    fn rejects_unknown_driver() {
        let err = Driver::from_name("pgsql").unwrap_err();
        assert!(matches!(err, OrmError::UnsupportedDriver(name) if name == "pgsql"));
    }

    #[test]
    fn insert_ignore_keyword_per_dialect() {
        assert_eq!(Driver::Mysql.insert_ignore_keyword(), "INSERT IGNORE");
        assert_eq!(Driver::Sqlite.insert_ignore_keyword(), "INSERT OR IGNORE");
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(Driver::Mysql.to_string(), "mysql");
        assert_eq!(Driver::Sqlite.to_string(), "sqlite");
    }
}
