//! Error types for the store layer.

use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// "Not found" is never an error here — single-row lookups model it as
/// `Ok(None)` and callers branch on it explicitly.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Pool or driver failure, including pool exhaustion. The triggering
    /// query has already been rolled back.
    #[error(transparent)]
    Database(#[from] emporia_db::DbError),

    /// A result row lacked a column the record shape requires.
    #[error("row is missing expected column '{column}'")]
    MissingColumn {
        /// The absent column name.
        column: String,
    },

    /// A result column held a value of the wrong SQLite type.
    #[error("column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        /// The offending column name.
        column: String,
        /// The SQLite type the record shape requires.
        expected: &'static str,
        /// The SQLite type actually found.
        found: &'static str,
    },

    /// The `status` column held text outside the order-status vocabulary.
    #[error("column '{column}' holds unrecognized order status '{value}'")]
    UnknownStatus {
        /// The offending column name.
        column: String,
        /// The unrecognized status text.
        value: String,
    },
}
