//! Database layer for the emporia backend.
//!
//! Provides a bounded SQLite connection pool with scoped unit-of-work
//! execution, parameterized query helpers, embedded SQL migrations, and
//! environment-driven configuration. Every table in emporia is created
//! through versioned migrations managed by this crate.
//!
//! # Design decisions
//!
//! - **Bounded pool with eager connections**: all N connections are opened
//!   at construction and live until [`ConnectionPool::close_all`]. The pool
//!   never grows or shrinks, so capacity exhaustion is an explicit, typed
//!   failure rather than unbounded connection churn.
//! - **Unit of work, not raw connections**: callers never hold a bare
//!   connection. [`ConnectionPool::with_transaction`] scopes each borrow,
//!   commits on success, rolls back on failure, and returns the connection
//!   to the pool on every exit path.
//! - **Explicit injection**: the pool is constructed once at the process
//!   composition root and passed by reference into the store layer. There
//!   is no module-level global.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, ensuring the schema ships with the code that depends
//!   on it.

mod config;
mod error;
mod migrations;
mod pool;
mod query;

pub use config::PoolConfig;
pub use error::DbError;
pub use migrations::{run_migrations, MigrationError};
pub use pool::ConnectionPool;
pub use query::{execute, execute_many, QueryResult, QueryRow};

// Re-exported so store code can build parameter lists without naming
// rusqlite directly.
pub use rusqlite::types::Value;
