//! Parameterized query helpers over the connection pool.
//!
//! [`execute`] and [`execute_many`] are the two entry points the store
//! layer builds on. Both acquire one pooled connection, run inside one
//! unit of work, and fully materialize results before the connection goes
//! back to the pool; no cursor or row handle ever escapes.
//!
//! Parameters are always bound positionally through the driver, never
//! interpolated into the SQL text. This is a correctness requirement
//! (injection safety), not a style preference.

use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Transaction};

use crate::error::DbError;
use crate::pool::ConnectionPool;

/// One result row: an ordered column-name → value mapping.
///
/// Column names are shared across all rows of a [`QueryResult`] rather
/// than copied per row.
#[derive(Debug, Clone)]
pub struct QueryRow {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl QueryRow {
    /// Looks up a value by column name. `None` means the query did not
    /// select that column at all; a selected SQL `NULL` is
    /// `Some(&Value::Null)`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
    }

    /// The column names of the originating query, in selection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Fully materialized outcome of one statement.
///
/// Statements that return rows carry them in `rows` with `rows_affected`
/// of zero; DML statements report the driver's affected count with empty
/// `rows`. Produced fresh per call and not retained by this layer.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Every result row, in the datastore's natural return order.
    pub rows: Vec<QueryRow>,
    /// Rows changed by a DML statement.
    pub rows_affected: usize,
}

/// Executes one parameterized statement as its own unit of work.
///
/// # Errors
///
/// Returns `DbError::PoolExhausted` if no connection becomes available,
/// or `DbError::Sqlite` if the statement fails (after rollback).
pub fn execute(pool: &ConnectionPool, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
    pool.with_transaction(|tx| run_statement(tx, sql, params))
}

/// Applies one parameterized statement once per tuple, in order, inside a
/// single unit of work. Returns the total affected-row count.
///
/// Because all tuples share one transaction, a failure on any tuple rolls
/// back every tuple — this is what distinguishes it from issuing N
/// independent [`execute`] calls.
///
/// # Errors
///
/// Returns `DbError::PoolExhausted` if no connection becomes available,
/// or `DbError::Sqlite` from the first failing tuple (after rollback).
pub fn execute_many(
    pool: &ConnectionPool,
    sql: &str,
    params_list: &[Vec<Value>],
) -> Result<usize, DbError> {
    pool.with_transaction(|tx| {
        let mut stmt = tx.prepare(sql)?;
        let mut total = 0;
        for params in params_list {
            total += stmt.execute(params_from_iter(params.iter()))?;
        }
        Ok(total)
    })
}

fn run_statement(
    tx: &mut Transaction<'_>,
    sql: &str,
    params: &[Value],
) -> Result<QueryResult, DbError> {
    let mut stmt = tx.prepare(sql)?;

    if stmt.column_count() == 0 {
        let rows_affected = stmt.execute(params_from_iter(params.iter()))?;
        return Ok(QueryResult {
            rows: Vec::new(),
            rows_affected,
        });
    }

    let columns: Arc<[String]> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let column_count = columns.len();

    let mut raw_rows = stmt.query(params_from_iter(params.iter()))?;
    let mut rows = Vec::new();
    while let Some(raw) = raw_rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            values.push(raw.get::<_, Value>(index)?);
        }
        rows.push(QueryRow {
            columns: Arc::clone(&columns),
            values,
        });
    }

    Ok(QueryResult {
        rows,
        rows_affected: 0,
    })
}
