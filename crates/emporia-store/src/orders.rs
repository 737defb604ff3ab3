//! Repository functions for customer orders.
//!
//! Orders are created in `pending` status and never deleted by this
//! layer; the payment processor drives status transitions through
//! [`update_order_status`].

use emporia_db::{execute, ConnectionPool, QueryRow, Value};
use emporia_types::{OrderRecord, OrderStatus};
use tracing::debug;

use crate::error::StoreError;
use crate::row::{require_f64, require_i64, require_status, require_text};

/// Fetches an order by internal id. `Ok(None)` when no such order exists.
///
/// # Errors
///
/// Returns `StoreError::Database` on pool or query failure, or a mapping
/// variant if the row does not match the record shape.
pub fn get_order_by_id(
    pool: &ConnectionPool,
    order_id: i64,
) -> Result<Option<OrderRecord>, StoreError> {
    let result = execute(
        pool,
        "SELECT id, user_id, total_amount, status, created_at FROM orders WHERE id = ?1",
        &[Value::Integer(order_id)],
    )?;
    result.rows.first().map(map_order).transpose()
}

/// Lists every order belonging to a user, in the datastore's natural
/// return order. A user with no orders yields an empty list.
///
/// # Errors
///
/// Returns `StoreError::Database` on pool or query failure, or a mapping
/// variant if any row does not match the record shape.
pub fn get_orders_by_user(
    pool: &ConnectionPool,
    user_id: i64,
) -> Result<Vec<OrderRecord>, StoreError> {
    let result = execute(
        pool,
        "SELECT id, user_id, total_amount, status, created_at FROM orders WHERE user_id = ?1",
        &[Value::Integer(user_id)],
    )?;
    result.rows.iter().map(map_order).collect()
}

/// Inserts a new order in `pending` status. Returns the affected-row
/// count (1 on success), not the generated id.
///
/// # Errors
///
/// Returns `StoreError::Database` on pool or query failure.
pub fn create_order(
    pool: &ConnectionPool,
    user_id: i64,
    total_amount: f64,
) -> Result<usize, StoreError> {
    let result = execute(
        pool,
        "INSERT INTO orders (user_id, total_amount, status) VALUES (?1, ?2, ?3)",
        &[
            Value::Integer(user_id),
            Value::Real(total_amount),
            Value::Text(OrderStatus::Pending.as_str().to_string()),
        ],
    )?;
    debug!(user_id, total_amount, "order created");
    Ok(result.rows_affected)
}

/// Sets an order's status. Returns whether a matching row existed; an
/// absent id is a no-op reported as `Ok(false)`, never an error.
///
/// # Errors
///
/// Returns `StoreError::Database` on pool or query failure.
pub fn update_order_status(
    pool: &ConnectionPool,
    order_id: i64,
    status: OrderStatus,
) -> Result<bool, StoreError> {
    let result = execute(
        pool,
        "UPDATE orders SET status = ?1 WHERE id = ?2",
        &[
            Value::Text(status.as_str().to_string()),
            Value::Integer(order_id),
        ],
    )?;
    Ok(result.rows_affected > 0)
}

pub(crate) fn map_order(row: &QueryRow) -> Result<OrderRecord, StoreError> {
    Ok(OrderRecord {
        id: require_i64(row, "id")?,
        user_id: require_i64(row, "user_id")?,
        total_amount: require_f64(row, "total_amount")?,
        status: require_status(row, "status")?,
        created_at: require_text(row, "created_at")?.to_string(),
    })
}
