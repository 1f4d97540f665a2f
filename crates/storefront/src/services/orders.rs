//! Read side of orders: listings, details and sales figures.

use mercado_core::OrderId;

use super::CommerceError;
use crate::models::order::{assemble_views, referenced_products};
use crate::models::{CurrentUser, DailySales, OrderView};
use crate::store::{Store, UnitOfWork};

/// Order queries over a [`Store`].
pub struct OrderQueryService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> OrderQueryService<'a, S> {
    /// Create a new order query service.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Orders visible to the requester, newest first.
    ///
    /// Admins see every order; everyone else sees their own.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Transaction` if the database fails.
    pub async fn list_orders_for_user(
        &self,
        requester: CurrentUser,
    ) -> Result<Vec<OrderView>, CommerceError> {
        let mut tx = self.store.begin().await?;

        let scope = (!requester.is_admin).then_some(requester.id);
        let orders = tx.list_orders(scope).await?;
        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
        let lines = tx.order_lines(&ids).await?;
        let payments = tx.payments(&ids).await?;
        let names = tx.product_names(&referenced_products(&lines)).await?;
        tx.commit().await?;

        Ok(assemble_views(orders, lines, payments, &names))
    }

    /// One order with its lines and payments.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the order does not exist.
    /// Returns `CommerceError::Forbidden` if the requester neither owns the
    /// order nor is an admin.
    pub async fn get_order_detail(
        &self,
        order_id: OrderId,
        requester: CurrentUser,
    ) -> Result<OrderView, CommerceError> {
        let mut tx = self.store.begin().await?;

        let order = tx
            .find_order(order_id)
            .await?
            .ok_or(CommerceError::NotFound("order"))?;
        if !requester.can_access(order.user_id) {
            return Err(CommerceError::Forbidden);
        }
        let lines = tx.order_lines(&[order_id]).await?;
        let payments = tx.payments(&[order_id]).await?;
        let names = tx.product_names(&referenced_products(&lines)).await?;
        tx.commit().await?;

        Ok(OrderView::new(order, lines, payments, &names))
    }

    /// Total sales per UTC calendar day, oldest first. Cancelled orders do
    /// not count.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Forbidden` unless the requester is an admin.
    pub async fn sales_by_date(
        &self,
        requester: CurrentUser,
    ) -> Result<Vec<DailySales>, CommerceError> {
        if !requester.is_admin {
            return Err(CommerceError::Forbidden);
        }
        let mut tx = self.store.begin().await?;
        let sales = tx.daily_sales().await?;
        tx.commit().await?;
        Ok(sales)
    }
}
