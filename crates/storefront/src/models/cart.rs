//! Shopping cart models and the cart read model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mercado_core::{CartId, CartLineId, Money, ProductId, UserId};

/// A user's cart. Each user has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// One product in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    /// Always positive.
    pub quantity: i32,
    /// Product price when the line was first added.
    pub unit_price: Money,
}

impl CartLine {
    /// Quantity times the snapshot unit price.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Sum of all line totals, using snapshot prices.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Money {
    lines.iter().map(CartLine::line_total).sum()
}

/// What the client sees when it asks for its cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub cart_id: CartId,
    pub lines: Vec<CartLine>,
    pub total: Money,
    /// Total number of units across all lines.
    pub item_count: i64,
}

impl CartView {
    /// Build the view for `cart` from its lines.
    #[must_use]
    pub fn new(cart: &Cart, lines: Vec<CartLine>) -> Self {
        let total = cart_total(&lines);
        let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();
        Self {
            cart_id: cart.id,
            lines,
            total,
            item_count,
        }
    }
}
