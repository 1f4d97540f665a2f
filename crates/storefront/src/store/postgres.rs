//! `PostgreSQL` unit of work backed by a sqlx transaction.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use mercado_core::{
    AddressId, CartId, CartLineId, Money, OrderId, OrderLineId, OrderStatus, PaymentId,
    PaymentMethodId, PaymentStatus, ProductId, UserId,
};

use super::{Store, UnitOfWork};
use crate::db::addresses::{ADDRESS_COLUMNS, AddressRow};
use crate::db::payment_methods::PaymentMethodRow;
use crate::db::products::{PRODUCT_COLUMNS, ProductRow};
use crate::db::{RepositoryError, map_constraint_error};
use crate::models::{
    Address, Cart, CartLine, DailySales, NewOrder, NewPayment, Order, OrderLine, Payment,
    PaymentMethod, Product,
};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: CartLineId,
    cart_id: CartId,
    product_id: ProductId,
    quantity: i32,
    unit_price: Decimal,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: row.id,
            cart_id: row.cart_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: Money::new(row.unit_price),
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, address_id, total, status, created_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    address_id: AddressId,
    total: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            address_id: row.address_id,
            total: Money::new(row.total),
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: OrderLineId,
    order_id: OrderId,
    product_id: Option<ProductId>,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: Money::new(row.unit_price),
        }
    }
}

const PAYMENT_COLUMNS: &str = "id, order_id, payment_method_id, amount, status, created_at";

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: PaymentId,
    order_id: OrderId,
    payment_method_id: PaymentMethodId,
    amount: Decimal,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            payment_method_id: row.payment_method_id,
            amount: Money::new(row.amount),
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DailySalesRow {
    date: NaiveDate,
    total_sales: Decimal,
}

fn raw_ids<T: Copy + Into<i32>>(ids: &[T]) -> Vec<i32> {
    ids.iter().map(|&id| id.into()).collect()
}

// =============================================================================
// Store
// =============================================================================

/// Store that opens a database transaction per unit of work.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    type Tx = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(PgUnitOfWork { tx })
    }
}

/// An open transaction. Rolled back on drop unless committed.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl UnitOfWork for PgUnitOfWork {
    async fn find_address(
        &mut self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM shop.address WHERE id = $1 AND user_id = $2"
        );
        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_payment_method(
        &mut self,
        id: PaymentMethodId,
    ) -> Result<Option<PaymentMethod>, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentMethodRow>(
            "SELECT id, name FROM shop.payment_method WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_product(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn product_names(
        &mut self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, String>, RepositoryError> {
        let rows = sqlx::query_as::<_, (ProductId, String)>(
            "SELECT id, name FROM shop.product WHERE id = ANY($1)",
        )
        .bind(raw_ids(ids))
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn decrement_stock(
        &mut self,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.product
            SET stock = stock - $2, updated_at = now()
            WHERE id = $1 AND stock >= $2
            ",
        )
        .bind(id)
        .bind(quantity)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn increment_stock(
        &mut self,
        id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE shop.product SET stock = stock + $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(quantity)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn find_cart(&mut self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, user_id, created_at FROM shop.cart WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_or_create_cart(&mut self, user_id: UserId) -> Result<Cart, RepositoryError> {
        sqlx::query(
            "INSERT INTO shop.cart (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_constraint_error(e, "cart already exists", "unknown user"))?;

        self.find_cart(user_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("cart for user {user_id} vanished"))
        })
    }

    async fn cart_lines(&mut self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT id, cart_id, product_id, quantity, unit_price
            FROM shop.cart_line
            WHERE cart_id = $1
            ORDER BY id
            ",
        )
        .bind(cart_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_cart_line(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        unit_price: Money,
    ) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(
            r"
            INSERT INTO shop.cart_line (cart_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, cart_id, product_id, quantity, unit_price
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price.amount())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_constraint_error(e, "product already in cart", "unknown product"))?;

        Ok(row.into())
    }

    async fn set_cart_line_quantity(
        &mut self,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        sqlx::query_as::<_, CartLineRow>(
            r"
            UPDATE shop.cart_line SET quantity = $2
            WHERE id = $1
            RETURNING id, cart_id, product_id, quantity, unit_price
            ",
        )
        .bind(line_id)
        .bind(quantity)
        .fetch_optional(&mut *self.tx)
        .await?
        .map(Into::into)
        .ok_or(RepositoryError::NotFound)
    }

    async fn delete_cart_line(
        &mut self,
        cart_id: CartId,
        line_id: CartLineId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_line WHERE id = $1 AND cart_id = $2")
            .bind(line_id)
            .bind(cart_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_cart(&mut self, cart_id: CartId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_line WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.customer_order (user_id, address_id, total, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order.user_id)
            .bind(order.address_id)
            .bind(order.total.amount())
            .bind(order.status)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(row.into())
    }

    async fn insert_order_line(
        &mut self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: i32,
        unit_price: Money,
    ) -> Result<OrderLine, RepositoryError> {
        let row = sqlx::query_as::<_, OrderLineRow>(
            r"
            INSERT INTO shop.order_line (order_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, product_id, quantity, unit_price
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price.amount())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row.into())
    }

    async fn find_order(&mut self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM shop.customer_order WHERE id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn transition_order(
        &mut self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let sql = format!(
            "UPDATE shop.customer_order SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_orders(
        &mut self,
        user_id: Option<UserId>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order
             WHERE ($1::INT4 IS NULL OR user_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn order_lines(
        &mut self,
        order_ids: &[OrderId],
    ) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT id, order_id, product_id, quantity, unit_price
            FROM shop.order_line
            WHERE order_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(raw_ids(order_ids))
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn payments(&mut self, order_ids: &[OrderId]) -> Result<Vec<Payment>, RepositoryError> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM shop.payment WHERE order_id = ANY($1) ORDER BY id"
        );
        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(raw_ids(order_ids))
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_payment(&mut self, payment: NewPayment) -> Result<Payment, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.payment (order_id, payment_method_id, amount, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {PAYMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(payment.order_id)
            .bind(payment.payment_method_id)
            .bind(payment.amount.amount())
            .bind(payment.status)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| {
                map_constraint_error(e, "order already has a payment", "unknown payment method")
            })?;

        Ok(row.into())
    }

    async fn daily_sales(&mut self) -> Result<Vec<DailySales>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailySalesRow>(
            r"
            SELECT (created_at AT TIME ZONE 'UTC')::DATE AS date,
                   SUM(total) AS total_sales
            FROM shop.customer_order
            WHERE status <> 'cancelled'
            GROUP BY 1
            ORDER BY 1
            ",
        )
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailySales {
                date: row.date,
                total_sales: Money::new(row.total_sales),
            })
            .collect())
    }

    async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}
