//! Unit tests for the user and order repositories.

use std::time::Duration;

use emporia_db::{execute, ConnectionPool, PoolConfig, Value};
use emporia_types::OrderStatus;

use crate::error::StoreError;
use crate::orders::{
    create_order, get_order_by_id, get_orders_by_user, map_order, update_order_status,
};
use crate::users::{
    create_user, deactivate_user, get_user_by_id, get_user_by_username, map_user, NewUser,
};

/// Creates a migrated on-disk database with a small pool. The temp dir
/// must stay alive as long as the pool does.
fn test_store() -> (tempfile::TempDir, ConnectionPool) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("store_test.db");
    let pool = ConnectionPool::new(PoolConfig {
        database_path: path.to_string_lossy().into_owned(),
        capacity: 2,
        acquire_timeout: Duration::from_secs(1),
    })
    .expect("should create pool");
    pool.migrate().expect("migrations should succeed");
    (dir, pool)
}

fn seed_user(pool: &ConnectionPool, username: &str) -> i64 {
    let affected = create_user(
        pool,
        &NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
        },
    )
    .expect("should create user");
    assert_eq!(affected, 1);

    get_user_by_username(pool, username)
        .expect("should look up seeded user")
        .expect("seeded user should exist")
        .id
}

// ── user repository tests ────────────────────────────────────────────

#[test]
fn get_user_by_id_returns_none_for_missing_id() {
    let (_dir, pool) = test_store();
    let user = get_user_by_id(&pool, 9999).expect("lookup should succeed");
    assert!(user.is_none());
}

#[test]
fn created_user_round_trips_with_all_fields() {
    let (_dir, pool) = test_store();
    let id = seed_user(&pool, "ada");

    let user = get_user_by_id(&pool, id)
        .expect("lookup should succeed")
        .expect("user should exist");
    assert_eq!(user.id, id);
    assert_eq!(user.username, "ada");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.password_hash, "hash");
    assert!(user.is_active);
}

#[test]
fn get_user_by_username_finds_the_right_row() {
    let (_dir, pool) = test_store();
    seed_user(&pool, "ada");
    seed_user(&pool, "grace");

    let user = get_user_by_username(&pool, "grace")
        .expect("lookup should succeed")
        .expect("user should exist");
    assert_eq!(user.username, "grace");

    let missing = get_user_by_username(&pool, "nobody").expect("lookup should succeed");
    assert!(missing.is_none());
}

#[test]
fn duplicate_username_is_a_database_error() {
    let (_dir, pool) = test_store();
    seed_user(&pool, "ada");

    let result = create_user(
        &pool,
        &NewUser {
            username: "ada".to_string(),
            email: "other@example.com".to_string(),
            password_hash: "hash2".to_string(),
        },
    );
    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[test]
fn deactivate_user_flips_the_flag_and_reports_matches() {
    let (_dir, pool) = test_store();
    let id = seed_user(&pool, "ada");

    assert!(deactivate_user(&pool, id).expect("deactivate should succeed"));
    let user = get_user_by_id(&pool, id)
        .expect("lookup should succeed")
        .expect("user should exist");
    assert!(!user.is_active);

    // Absent id: a no-op reported as false, not an error.
    assert!(!deactivate_user(&pool, 9999).expect("no-op should succeed"));
}

// ── order repository tests ───────────────────────────────────────────

#[test]
fn created_order_is_pending_with_the_given_amount() {
    let (_dir, pool) = test_store();

    let affected = create_order(&pool, 7, 42.50).expect("create should succeed");
    assert_eq!(affected, 1);

    let orders = get_orders_by_user(&pool, 7).expect("list should succeed");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].user_id, 7);
    assert_eq!(orders[0].total_amount, 42.50);
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert!(!orders[0].created_at.is_empty());
}

#[test]
fn get_orders_by_user_scopes_to_the_owner() {
    let (_dir, pool) = test_store();
    create_order(&pool, 1, 10.0).expect("create should succeed");
    create_order(&pool, 2, 20.0).expect("create should succeed");
    create_order(&pool, 1, 30.0).expect("create should succeed");

    let orders = get_orders_by_user(&pool, 1).expect("list should succeed");
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.user_id == 1));

    let none = get_orders_by_user(&pool, 3).expect("list should succeed");
    assert!(none.is_empty());
}

#[test]
fn get_order_by_id_returns_none_for_missing_id() {
    let (_dir, pool) = test_store();
    let order = get_order_by_id(&pool, 12345).expect("lookup should succeed");
    assert!(order.is_none());
}

#[test]
fn update_order_status_transitions_and_reports_matches() {
    let (_dir, pool) = test_store();
    create_order(&pool, 1, 99.0).expect("create should succeed");
    let order_id = get_orders_by_user(&pool, 1).expect("list should succeed")[0].id;

    assert!(update_order_status(&pool, order_id, OrderStatus::Paid)
        .expect("update should succeed"));
    let order = get_order_by_id(&pool, order_id)
        .expect("lookup should succeed")
        .expect("order should exist");
    assert_eq!(order.status, OrderStatus::Paid);

    assert!(!update_order_status(&pool, 9999, OrderStatus::Cancelled)
        .expect("no-op should succeed"));
}

// ── mapping strictness tests ─────────────────────────────────────────

#[test]
fn mapping_fails_loudly_on_a_missing_column() {
    let (_dir, pool) = test_store();
    let id = seed_user(&pool, "ada");

    // A projection narrower than the record shape must not map.
    let result = execute(
        &pool,
        "SELECT id, username FROM users WHERE id = ?1",
        &[Value::Integer(id)],
    )
    .expect("query should succeed");

    let err = map_user(&result.rows[0]).expect_err("mapping should fail");
    assert!(matches!(err, StoreError::MissingColumn { ref column } if column == "email"));
}

#[test]
fn mapping_fails_loudly_on_a_mistyped_column() {
    let (_dir, pool) = test_store();
    let id = seed_user(&pool, "ada");

    // Alias a text column into the id slot.
    let result = execute(
        &pool,
        "SELECT username AS id, username, email, password_hash, is_active
         FROM users WHERE id = ?1",
        &[Value::Integer(id)],
    )
    .expect("query should succeed");

    let err = map_user(&result.rows[0]).expect_err("mapping should fail");
    assert!(matches!(
        err,
        StoreError::ColumnType { ref column, expected: "integer", .. } if column == "id"
    ));
}

#[test]
fn unknown_status_text_is_a_mapping_failure() {
    let (_dir, pool) = test_store();
    create_order(&pool, 1, 10.0).expect("create should succeed");
    let order_id = get_orders_by_user(&pool, 1).expect("list should succeed")[0].id;

    // Corrupt the status outside the typed update path.
    execute(
        &pool,
        "UPDATE orders SET status = ?1 WHERE id = ?2",
        &[Value::Text("mystery".to_string()), Value::Integer(order_id)],
    )
    .expect("raw update should succeed");

    let err = get_order_by_id(&pool, order_id).expect_err("mapping should fail");
    assert!(matches!(
        err,
        StoreError::UnknownStatus { ref value, .. } if value == "mystery"
    ));
}

#[test]
fn map_order_requires_every_column() {
    let (_dir, pool) = test_store();
    create_order(&pool, 1, 10.0).expect("create should succeed");

    let result = execute(
        &pool,
        "SELECT id, user_id, total_amount FROM orders",
        &[],
    )
    .expect("query should succeed");

    let err = map_order(&result.rows[0]).expect_err("mapping should fail");
    assert!(matches!(err, StoreError::MissingColumn { ref column } if column == "status"));
}
