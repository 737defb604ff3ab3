//! Checked row→record field extraction.
//!
//! Each helper pulls one named column out of a [`QueryRow`] and coerces it
//! to the record field type, failing loudly on a missing column or a
//! mistyped value. This is the strict contract between the SQL schema and
//! the typed record shapes: nothing is ever silently defaulted.

use emporia_db::{QueryRow, Value};
use emporia_types::OrderStatus;

use crate::error::StoreError;

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    }
}

fn fetch<'r>(row: &'r QueryRow, column: &str) -> Result<&'r Value, StoreError> {
    row.get(column).ok_or_else(|| StoreError::MissingColumn {
        column: column.to_string(),
    })
}

pub(crate) fn require_i64(row: &QueryRow, column: &str) -> Result<i64, StoreError> {
    match fetch(row, column)? {
        Value::Integer(value) => Ok(*value),
        other => Err(StoreError::ColumnType {
            column: column.to_string(),
            expected: "integer",
            found: value_type(other),
        }),
    }
}

pub(crate) fn require_f64(row: &QueryRow, column: &str) -> Result<f64, StoreError> {
    match fetch(row, column)? {
        Value::Real(value) => Ok(*value),
        // SQLite numeric affinity may hand back an integer for a whole
        // amount; that is the same number, not a schema mismatch.
        Value::Integer(value) => Ok(*value as f64),
        other => Err(StoreError::ColumnType {
            column: column.to_string(),
            expected: "real",
            found: value_type(other),
        }),
    }
}

pub(crate) fn require_text<'r>(row: &'r QueryRow, column: &str) -> Result<&'r str, StoreError> {
    match fetch(row, column)? {
        Value::Text(value) => Ok(value),
        other => Err(StoreError::ColumnType {
            column: column.to_string(),
            expected: "text",
            found: value_type(other),
        }),
    }
}

/// Booleans are stored as 0/1 integers; any non-zero integer reads as true.
pub(crate) fn require_bool(row: &QueryRow, column: &str) -> Result<bool, StoreError> {
    Ok(require_i64(row, column)? != 0)
}

pub(crate) fn require_status(row: &QueryRow, column: &str) -> Result<OrderStatus, StoreError> {
    let text = require_text(row, column)?;
    text.parse().map_err(|_| StoreError::UnknownStatus {
        column: column.to_string(),
        value: text.to_string(),
    })
}
