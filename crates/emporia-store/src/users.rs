//! Repository functions for user accounts.

use emporia_db::{execute, ConnectionPool, QueryRow, Value};
use emporia_types::UserRecord;
use tracing::debug;

use crate::error::StoreError;
use crate::row::{require_bool, require_i64, require_text};

/// Fields required to register a new user. The id is assigned by the
/// database; `is_active` starts true.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Fetches a user by internal id. `Ok(None)` when no such user exists.
///
/// # Errors
///
/// Returns `StoreError::Database` on pool or query failure, or a mapping
/// variant if the row does not match the record shape.
pub fn get_user_by_id(pool: &ConnectionPool, user_id: i64) -> Result<Option<UserRecord>, StoreError> {
    let result = execute(
        pool,
        "SELECT id, username, email, password_hash, is_active FROM users WHERE id = ?1",
        &[Value::Integer(user_id)],
    )?;
    result.rows.first().map(map_user).transpose()
}

/// Fetches a user by unique login name. `Ok(None)` when no such user
/// exists.
///
/// # Errors
///
/// Returns `StoreError::Database` on pool or query failure, or a mapping
/// variant if the row does not match the record shape.
pub fn get_user_by_username(
    pool: &ConnectionPool,
    username: &str,
) -> Result<Option<UserRecord>, StoreError> {
    let result = execute(
        pool,
        "SELECT id, username, email, password_hash, is_active FROM users WHERE username = ?1",
        &[Value::Text(username.to_string())],
    )?;
    result.rows.first().map(map_user).transpose()
}

/// Inserts a new active user. Returns the affected-row count (1 on
/// success), not the generated id; callers that need the id should follow
/// with [`get_user_by_username`].
///
/// # Errors
///
/// Returns `StoreError::Database` on pool or query failure, including a
/// uniqueness violation on the username.
pub fn create_user(pool: &ConnectionPool, user: &NewUser) -> Result<usize, StoreError> {
    let result = execute(
        pool,
        "INSERT INTO users (username, email, password_hash, is_active) VALUES (?1, ?2, ?3, 1)",
        &[
            Value::Text(user.username.clone()),
            Value::Text(user.email.clone()),
            Value::Text(user.password_hash.clone()),
        ],
    )?;
    debug!(username = %user.username, "user created");
    Ok(result.rows_affected)
}

/// Marks a user inactive. Returns whether a matching row existed; an
/// absent id is a no-op reported as `Ok(false)`, never an error.
///
/// # Errors
///
/// Returns `StoreError::Database` on pool or query failure.
pub fn deactivate_user(pool: &ConnectionPool, user_id: i64) -> Result<bool, StoreError> {
    let result = execute(
        pool,
        "UPDATE users SET is_active = 0 WHERE id = ?1",
        &[Value::Integer(user_id)],
    )?;
    Ok(result.rows_affected > 0)
}

pub(crate) fn map_user(row: &QueryRow) -> Result<UserRecord, StoreError> {
    Ok(UserRecord {
        id: require_i64(row, "id")?,
        username: require_text(row, "username")?.to_string(),
        email: require_text(row, "email")?.to_string(),
        password_hash: require_text(row, "password_hash")?.to_string(),
        is_active: require_bool(row, "is_active")?,
    })
}
