//! Payment methods and payments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{Money, OrderId, PaymentId, PaymentMethodId, PaymentStatus};

/// A way of paying, such as "credit card" or "cash".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
}

/// Input for creating a payment method.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPaymentMethod {
    pub name: String,
}

/// A payment recorded against an order.
///
/// An order has at most one payment, and its amount always equals the
/// order total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub payment_method_id: PaymentMethodId,
    pub amount: Money,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// Values for inserting a payment.
#[derive(Debug, Clone, Copy)]
pub struct NewPayment {
    pub order_id: OrderId,
    pub payment_method_id: PaymentMethodId,
    pub amount: Money,
    pub status: PaymentStatus,
}
