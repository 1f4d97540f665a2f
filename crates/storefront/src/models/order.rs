//! Orders, order lines and the order read model.
//!
//! Orders are immutable once written except for their status. Order lines
//! keep the unit price the customer paid; `product_id` becomes `None` if the
//! product is later deleted from the catalog.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{AddressId, Money, OrderId, OrderLineId, OrderStatus, ProductId, UserId};

use super::payment::Payment;

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub address_id: AddressId,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub quantity: i32,
    pub unit_price: Money,
}

/// Values for inserting an order.
#[derive(Debug, Clone, Copy)]
pub struct NewOrder {
    pub user_id: UserId,
    pub address_id: AddressId,
    pub total: Money,
    pub status: OrderStatus,
}

/// Body of an admin status change.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
}

/// An order line as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineView {
    pub id: OrderLineId,
    pub product_id: Option<ProductId>,
    /// `None` when the product no longer exists.
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// An order with its lines and payments.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLineView>,
    pub payments: Vec<Payment>,
}

/// Sales total for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total_sales: Money,
}

impl OrderLineView {
    fn new(line: OrderLine, product_names: &HashMap<ProductId, String>) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            product_name: line
                .product_id
                .and_then(|id| product_names.get(&id).cloned()),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.unit_price.times(line.quantity),
        }
    }
}

impl OrderView {
    /// Build the view of one order from its rows.
    #[must_use]
    pub fn new(
        order: Order,
        lines: Vec<OrderLine>,
        payments: Vec<Payment>,
        product_names: &HashMap<ProductId, String>,
    ) -> Self {
        Self {
            order,
            lines: lines
                .into_iter()
                .map(|line| OrderLineView::new(line, product_names))
                .collect(),
            payments,
        }
    }
}

/// Group lines and payments under their orders.
///
/// Orders keep the order they were given in. Lines keep their relative
/// order within each order. Lines or payments whose order is not in
/// `orders` are dropped.
#[must_use]
pub fn assemble_views(
    orders: Vec<Order>,
    lines: Vec<OrderLine>,
    payments: Vec<Payment>,
    product_names: &HashMap<ProductId, String>,
) -> Vec<OrderView> {
    let mut lines_by_order: HashMap<OrderId, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        lines_by_order.entry(line.order_id).or_default().push(line);
    }

    let mut payments_by_order: HashMap<OrderId, Vec<Payment>> = HashMap::new();
    for payment in payments {
        payments_by_order
            .entry(payment.order_id)
            .or_default()
            .push(payment);
    }

    orders
        .into_iter()
        .map(|order| {
            let lines = lines_by_order.remove(&order.id).unwrap_or_default();
            let payments = payments_by_order.remove(&order.id).unwrap_or_default();
            OrderView::new(order, lines, payments, product_names)
        })
        .collect()
}

/// Distinct product IDs referenced by `lines`.
#[must_use]
pub fn referenced_products(lines: &[OrderLine]) -> Vec<ProductId> {
    let mut ids: Vec<ProductId> = lines.iter().filter_map(|l| l.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
