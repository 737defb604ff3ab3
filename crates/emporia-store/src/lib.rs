//! Typed data access for the emporia backend.
//!
//! One group of stateless accessor functions per domain entity (users,
//! orders). Every function takes the [`ConnectionPool`] by reference —
//! the pool is constructed once at the composition root and injected, so
//! this crate owns no state of its own. Callers (route handlers, auth,
//! payments) see typed records and never raw connections or SQL.
//!
//! Conventions shared by every accessor:
//!
//! - Single-row lookups return `Ok(None)` when nothing matches, never an
//!   error and never a partially populated record.
//! - List lookups return rows in the datastore's natural order.
//! - `create_*` returns the affected-row count, not a generated id.
//! - Conditional mutations return `Ok(false)` when the id matched nothing.
//! - Row→record mapping is strict: a missing column, a mistyped value, or
//!   an unrecognized status string fails the call with a [`StoreError`]
//!   mapping variant, since it signals a schema/code mismatch that
//!   retrying cannot fix.

mod error;
mod orders;
mod row;
mod users;

#[cfg(test)]
mod tests;

pub use emporia_db::ConnectionPool;

pub use error::StoreError;
pub use orders::{create_order, get_order_by_id, get_orders_by_user, update_order_status};
pub use users::{create_user, deactivate_user, get_user_by_id, get_user_by_username, NewUser};
