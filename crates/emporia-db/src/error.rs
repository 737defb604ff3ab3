//! Error types for the database layer.

use std::time::Duration;

use thiserror::Error;

use crate::migrations::MigrationError;

/// Errors that can occur during pool and query operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// No connection became idle within the acquire timeout. A transient
    /// capacity failure: callers may retry with backoff or surface it as
    /// service-unavailable, but it must not be silently dropped.
    #[error("connection pool exhausted: no idle connection after {waited:?}")]
    PoolExhausted {
        /// How long the caller waited before giving up.
        waited: Duration,
    },

    /// The underlying SQLite driver rejected an operation. Propagated to
    /// the caller after the pool has rolled back the unit of work; never
    /// retried internally.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A schema migration failed.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// The pool was constructed with invalid settings.
    #[error("invalid pool configuration: {0}")]
    Config(String),
}
