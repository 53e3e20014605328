//! SQL logging via `tracing`.
//!
//! Clients report every executed statement to a [`TracingSqlHook`], which
//! emits one event on the `dupkey.sql` target.

use crate::driver::Driver;
use std::time::Duration;
use tracing::Level;

/// Truncate a string to at most `max_bytes` bytes, respecting UTF-8 char boundaries.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// What happened to one statement.
#[derive(Debug, Clone)]
pub struct QueryEvent<'a> {
    /// Statement flavor (`insert_ignore`, ...) or `-` for untagged SQL
    pub tag: &'a str,
    pub driver: Driver,
    pub sql: &'a str,
    pub param_count: usize,
    pub duration: Duration,
    /// Affected rows, or the error message
    pub outcome: Result<u64, String>,
}

/// A `tracing`-based hook that logs executed SQL.
///
/// Failures are always logged at `WARN`; successes at the configured level.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingSqlHook {
    /// Create a new hook with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Emit the event for one executed statement.
    pub fn on_query(&self, event: &QueryEvent<'_>) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(event.sql);
        let elapsed_ms = event.duration.as_secs_f64() * 1000.0;
        match &event.outcome {
            Ok(rows) => emit_at_level!(
                self.level,
                target: "dupkey.sql",
                kind = event.tag,
                driver = %event.driver,
                param_count = event.param_count,
                rows = *rows,
                elapsed_ms,
                sql = %sql,
            ),
            Err(error) => tracing::warn!(
                target: "dupkey.sql",
                kind = event.tag,
                driver = %event.driver,
                param_count = event.param_count,
                elapsed_ms,
                error = %error,
                sql = %sql,
                "statement failed"
            ),
        }
    }
}
