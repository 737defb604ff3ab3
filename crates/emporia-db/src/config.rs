//! Pool configuration from environment variables.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Settings for [`crate::ConnectionPool`], read once at construction.
///
/// Environment variable overrides (see [`PoolConfig::from_env`]):
/// - `DATABASE_URL` overrides `database_path`
/// - `DB_POOL_SIZE` overrides `capacity`
/// - `DB_ACQUIRE_TIMEOUT_MS` overrides `acquire_timeout`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Path to the SQLite database file.
    pub database_path: String,

    /// Number of connections the pool opens and owns. Must be at least 1.
    pub capacity: usize,

    /// How long a caller blocks waiting for an idle connection before the
    /// acquisition fails with `PoolExhausted`.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            capacity: default_capacity(),
            acquire_timeout: default_acquire_timeout(),
        }
    }
}

fn default_database_path() -> String {
    "emporia.db".to_string()
}

fn default_capacity() -> usize {
    5
}

fn default_acquire_timeout() -> Duration {
    Duration::from_secs(5)
}

impl PoolConfig {
    /// Builds a configuration from the process environment, falling back
    /// to defaults for anything unset. Malformed numeric values fall back
    /// to their defaults with a warning rather than aborting startup.
    pub fn from_env() -> Self {
        let database_path =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| default_database_path());
        let capacity = parse_or_default(
            std::env::var("DB_POOL_SIZE").ok(),
            default_capacity(),
            "DB_POOL_SIZE",
        );
        let timeout_ms = parse_or_default(
            std::env::var("DB_ACQUIRE_TIMEOUT_MS").ok(),
            default_acquire_timeout().as_millis() as u64,
            "DB_ACQUIRE_TIMEOUT_MS",
        );

        Self {
            database_path,
            capacity,
            acquire_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

fn parse_or_default<T>(raw: Option<String>, default: T, var: &str) -> T
where
    T: FromStr + Display,
{
    match raw {
        None => default,
        Some(text) => match text.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %text,
                    fallback = %default,
                    "ignoring malformed environment override"
                );
                default
            }
        },
    }
}
