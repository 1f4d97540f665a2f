//! Status enums for orders and payments.
//!
//! Both are small closed sets stored as Postgres enum types in the `shop`
//! schema. Transition rules live here so every caller agrees on them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status name that is not part of the set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct ParseStatusError(String);

/// Lifecycle status of an order.
///
/// ```text
/// pending    -> processing | cancelled
/// processing -> shipped | completed | cancelled
/// shipped    -> completed
/// ```
///
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order registered, waiting for payment.
    #[default]
    Pending,
    /// Paid and being prepared.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Delivered.
    Completed,
    /// Cancelled before completion; stock was returned.
    Cancelled,
}

impl OrderStatus {
    /// Returns `true` if no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` if an order may move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing | Self::Cancelled)
                | (
                    Self::Processing,
                    Self::Shipped | Self::Completed | Self::Cancelled
                )
                | (Self::Shipped, Self::Completed)
        )
    }

    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}

/// Status of a payment attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.payment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl PaymentStatus {
    /// Returns `true` if no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_valid_order_transitions() {
        let valid = [
            (OrderStatus::Pending, OrderStatus::Processing),
            (OrderStatus::Pending, OrderStatus::Cancelled),
            (OrderStatus::Processing, OrderStatus::Shipped),
            (OrderStatus::Processing, OrderStatus::Completed),
            (OrderStatus::Processing, OrderStatus::Cancelled),
            (OrderStatus::Shipped, OrderStatus::Completed),
        ];

        for (from, to) in valid {
            assert!(from.can_transition_to(to), "{from} -> {to} should be allowed");
        }
    }

    #[test]
    fn test_invalid_order_transitions() {
        let invalid = [
            (OrderStatus::Processing, OrderStatus::Pending),
            (OrderStatus::Shipped, OrderStatus::Cancelled),
            (OrderStatus::Pending, OrderStatus::Shipped),
            (OrderStatus::Pending, OrderStatus::Pending),
        ];

        for (from, to) in invalid {
            assert!(!from.can_transition_to(to), "{from} -> {to} should be rejected");
        }
    }

    #[test]
    fn test_terminal_order_states_have_no_exits() {
        for from in ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn test_order_status_parse_matches_display() {
        for status in ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!(
            "refunded".parse::<OrderStatus>().unwrap_err().to_string(),
            "invalid order status: refunded"
        );
    }

    #[test]
    fn test_payment_status_terminal() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Approved.is_terminal());
        assert!(PaymentStatus::Rejected.is_terminal());
    }
}
