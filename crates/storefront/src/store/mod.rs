//! Unit of work for the cart and order workflows.
//!
//! A [`Store`] hands out [`UnitOfWork`] handles. Every read and write a
//! workflow performs goes through one handle, and nothing is visible to
//! other callers until [`UnitOfWork::commit`] succeeds. Dropping a handle
//! without committing discards all of its writes.
//!
//! Production uses [`PgStore`], where a handle is a database transaction.

pub mod postgres;

#[cfg(test)]
pub(crate) mod memory;

use std::collections::HashMap;
use std::future::Future;

use mercado_core::{
    AddressId, CartId, CartLineId, Money, OrderId, OrderStatus, PaymentMethodId, ProductId, UserId,
};

use crate::db::RepositoryError;
use crate::models::{
    Address, Cart, CartLine, DailySales, NewOrder, NewPayment, Order, OrderLine, Payment,
    PaymentMethod, Product,
};

pub use postgres::{PgStore, PgUnitOfWork};

/// Source of units of work.
pub trait Store: Send + Sync {
    /// Handle type returned by [`Store::begin`].
    type Tx: UnitOfWork;

    /// Start a new unit of work.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx, RepositoryError>> + Send;
}

/// One atomic set of reads and writes.
///
/// Reads see the handle's own uncommitted writes.
pub trait UnitOfWork: Send {
    // -------------------------------------------------------------------------
    // Accounts and lookups
    // -------------------------------------------------------------------------

    /// Find an address owned by `user_id`.
    fn find_address(
        &mut self,
        user_id: UserId,
        id: AddressId,
    ) -> impl Future<Output = Result<Option<Address>, RepositoryError>> + Send;

    /// Find a payment method.
    fn find_payment_method(
        &mut self,
        id: PaymentMethodId,
    ) -> impl Future<Output = Result<Option<PaymentMethod>, RepositoryError>> + Send;

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Find a product with its current stock.
    fn find_product(
        &mut self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// Names of the given products. Missing products are left out.
    fn product_names(
        &mut self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<HashMap<ProductId, String>, RepositoryError>> + Send;

    /// Take `quantity` units out of stock if at least that many remain.
    ///
    /// Returns `false`, leaving stock untouched, if there are not enough
    /// units or the product does not exist.
    fn decrement_stock(
        &mut self,
        id: ProductId,
        quantity: i32,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Put `quantity` units back into stock. A missing product is ignored.
    fn increment_stock(
        &mut self,
        id: ProductId,
        quantity: i32,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Find and lock the user's cart.
    fn find_cart(
        &mut self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Cart>, RepositoryError>> + Send;

    /// Find and lock the user's cart, creating it if needed.
    fn get_or_create_cart(
        &mut self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Cart, RepositoryError>> + Send;

    /// Lines of a cart in the order they were added.
    fn cart_lines(
        &mut self,
        cart_id: CartId,
    ) -> impl Future<Output = Result<Vec<CartLine>, RepositoryError>> + Send;

    /// Add a new line to a cart.
    fn insert_cart_line(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        unit_price: Money,
    ) -> impl Future<Output = Result<CartLine, RepositoryError>> + Send;

    /// Overwrite a line's quantity. The snapshot price is unchanged.
    fn set_cart_line_quantity(
        &mut self,
        line_id: CartLineId,
        quantity: i32,
    ) -> impl Future<Output = Result<CartLine, RepositoryError>> + Send;

    /// Delete a line from a cart. Returns `false` if the cart has no such line.
    fn delete_cart_line(
        &mut self,
        cart_id: CartId,
        line_id: CartLineId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete every line of a cart. Returns the number removed.
    fn clear_cart(
        &mut self,
        cart_id: CartId,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    // -------------------------------------------------------------------------
    // Orders and payments
    // -------------------------------------------------------------------------

    /// Insert an order header.
    fn insert_order(
        &mut self,
        order: NewOrder,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;

    /// Insert one line of an order.
    fn insert_order_line(
        &mut self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: i32,
        unit_price: Money,
    ) -> impl Future<Output = Result<OrderLine, RepositoryError>> + Send;

    /// Find an order by ID.
    fn find_order(
        &mut self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, RepositoryError>> + Send;

    /// Move an order from `from` to `to`.
    ///
    /// Returns `None` if the order is no longer in status `from`.
    fn transition_order(
        &mut self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> impl Future<Output = Result<Option<Order>, RepositoryError>> + Send;

    /// Orders newest first, all of them when `user_id` is `None`.
    fn list_orders(
        &mut self,
        user_id: Option<UserId>,
    ) -> impl Future<Output = Result<Vec<Order>, RepositoryError>> + Send;

    /// Lines of the given orders.
    fn order_lines(
        &mut self,
        order_ids: &[OrderId],
    ) -> impl Future<Output = Result<Vec<OrderLine>, RepositoryError>> + Send;

    /// Payments of the given orders.
    fn payments(
        &mut self,
        order_ids: &[OrderId],
    ) -> impl Future<Output = Result<Vec<Payment>, RepositoryError>> + Send;

    /// Insert a payment.
    ///
    /// Fails with `RepositoryError::Conflict` if the order already has one.
    fn insert_payment(
        &mut self,
        payment: NewPayment,
    ) -> impl Future<Output = Result<Payment, RepositoryError>> + Send;

    /// Sum of non-cancelled order totals per UTC day, oldest day first.
    fn daily_sales(
        &mut self,
    ) -> impl Future<Output = Result<Vec<DailySales>, RepositoryError>> + Send;

    /// Make every write of this unit visible.
    fn commit(self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
