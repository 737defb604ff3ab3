//! Shared domain records for the emporia backend.
//!
//! This crate holds the typed records that cross the boundary between the
//! data-access layer (`emporia-store`) and its callers (route handlers,
//! auth, payments). It depends on nothing else in the workspace, which
//! keeps the dependency graph clean and prevents circular dependencies.
//!
//! Records are plain data: all persistence logic lives in `emporia-store`,
//! and all connection management lives in `emporia-db`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A registered user account.
///
/// Rows come from the `users` table. The password hash is opaque to this
/// layer; verification belongs to the authentication component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Internal database ID. Unique and immutable.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Opaque password hash.
    pub password_hash: String,
    /// Whether the account is active. Deactivation is soft; rows are
    /// never deleted by the store layer.
    pub is_active: bool,
}

/// A customer order.
///
/// Rows come from the `orders` table. `user_id` is a foreign reference to
/// `users.id` but is not enforced in-process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Internal database ID. Unique and immutable.
    pub id: i64,
    /// ID of the user who owns this order.
    pub user_id: i64,
    /// Order total. Always positive.
    pub total_amount: f64,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Creation timestamp (ISO 8601, assigned by the database).
    pub created_at: String,
}

/// Lifecycle status of an order.
///
/// Orders are created as `Pending`; the payment processor drives the
/// remaining transitions through `update_order_status`. Stored lowercase
/// in the `orders.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting payment.
    Pending,
    /// Payment captured.
    Paid,
    /// Payment returned to the customer.
    Refunded,
    /// Abandoned or voided before payment.
    Cancelled,
}

impl OrderStatus {
    /// Returns the stored string form of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an order status from text that does not
/// match any known status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized order status '{0}'")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trips_through_str() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Refunded,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_is_an_error() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, UnknownOrderStatus("shipped".to_string()));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Paid).expect("serialize status");
        assert_eq!(json, "\"paid\"");
    }

    #[test]
    fn user_record_wire_shape() {
        let user = UserRecord {
            id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
        };
        let value = serde_json::to_value(&user).expect("serialize user");
        assert_eq!(value["id"], 1);
        assert_eq!(value["username"], "ada");
        assert_eq!(value["is_active"], true);
    }
}
