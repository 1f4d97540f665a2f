//! In-memory store for workflow tests.
//!
//! Units of work run one at a time: `begin` takes an owned lock on the
//! tables and works on a staged copy, which `commit` writes back. Dropping
//! the handle releases the lock and throws the copy away.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use mercado_core::{
    AddressId, CartId, CartLineId, Money, OrderId, OrderLineId, OrderStatus, PaymentId,
    PaymentMethodId, ProductId, UserId,
};

use super::{Store, UnitOfWork};
use crate::db::RepositoryError;
use crate::models::{
    Address, Cart, CartLine, DailySales, NewOrder, NewPayment, Order, OrderLine, Payment,
    PaymentMethod, Product,
};

/// Every row the workflows touch.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    next_id: i32,
    pub addresses: Vec<Address>,
    pub payment_methods: Vec<PaymentMethod>,
    pub products: Vec<Product>,
    pub carts: Vec<Cart>,
    pub cart_lines: Vec<CartLine>,
    pub orders: Vec<Order>,
    pub order_lines: Vec<OrderLine>,
    pub payments: Vec<Payment>,
    /// Products whose stock was taken, in the order the decrements ran.
    pub decrements: Vec<ProductId>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn stock(&self, id: ProductId) -> i32 {
        self.product(id).map_or(0, |p| p.stock)
    }

    pub fn lines_in_cart_of(&self, user_id: UserId) -> Vec<&CartLine> {
        let Some(cart) = self.carts.iter().find(|c| c.user_id == user_id) else {
            return Vec::new();
        };
        self.cart_lines
            .iter()
            .filter(|l| l.cart_id == cart.id)
            .collect()
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_payment_insert: AtomicBool,
    drain_stock_on_decrement: AtomicBool,
}

/// Shared in-memory tables with injectable failures.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    faults: Arc<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> Tables {
        self.tables.lock().await.clone()
    }

    pub async fn add_product(&self, name: &str, price: Money, stock: i32) -> ProductId {
        let mut tables = self.tables.lock().await;
        let id = ProductId::new(tables.next_id());
        let now = Utc::now();
        tables.products.push(Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            stock,
            image_url: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub async fn set_stock(&self, id: ProductId, stock: i32) {
        let mut tables = self.tables.lock().await;
        if let Some(product) = tables.products.iter_mut().find(|p| p.id == id) {
            product.stock = stock;
        }
    }

    pub async fn set_price(&self, id: ProductId, price: Money) {
        let mut tables = self.tables.lock().await;
        if let Some(product) = tables.products.iter_mut().find(|p| p.id == id) {
            product.price = price;
        }
    }

    /// Delete a product the way the database does: order lines lose their
    /// reference and cart lines are left dangling.
    pub async fn delete_product(&self, id: ProductId) {
        let mut tables = self.tables.lock().await;
        tables.products.retain(|p| p.id != id);
        for line in &mut tables.order_lines {
            if line.product_id == Some(id) {
                line.product_id = None;
            }
        }
    }

    pub async fn add_address(&self, user_id: UserId) -> AddressId {
        let mut tables = self.tables.lock().await;
        let id = AddressId::new(tables.next_id());
        tables.addresses.push(Address {
            id,
            user_id,
            street: "Calle Falsa 123".to_string(),
            city: "Springfield".to_string(),
            zip_code: "1000".to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub async fn add_payment_method(&self, name: &str) -> PaymentMethodId {
        let mut tables = self.tables.lock().await;
        let id = PaymentMethodId::new(tables.next_id());
        tables.payment_methods.push(PaymentMethod {
            id,
            name: name.to_string(),
        });
        id
    }

    pub async fn set_order_created_at(&self, id: OrderId, at: DateTime<Utc>) {
        let mut tables = self.tables.lock().await;
        if let Some(order) = tables.orders.iter_mut().find(|o| o.id == id) {
            order.created_at = at;
        }
    }

    /// Make every payment insert fail with a database error.
    pub fn fail_payment_insert(&self) {
        self.faults.fail_payment_insert.store(true, Ordering::SeqCst);
    }

    /// Empty a product's stock right before each guarded decrement, as if a
    /// concurrent checkout had committed in between.
    pub fn drain_stock_on_decrement(&self) {
        self.faults
            .drain_stock_on_decrement
            .store(true, Ordering::SeqCst);
    }
}

impl Store for MemoryStore {
    type Tx = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, RepositoryError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = guard.clone();
        Ok(MemoryUnitOfWork {
            guard,
            staged,
            faults: Arc::clone(&self.faults),
        })
    }
}

pub(crate) struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    faults: Arc<Faults>,
}

impl UnitOfWork for MemoryUnitOfWork {
    async fn find_address(
        &mut self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        Ok(self
            .staged
            .addresses
            .iter()
            .find(|a| a.id == id && a.user_id == user_id)
            .cloned())
    }

    async fn find_payment_method(
        &mut self,
        id: PaymentMethodId,
    ) -> Result<Option<PaymentMethod>, RepositoryError> {
        Ok(self
            .staged
            .payment_methods
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn find_product(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.staged.product(id).cloned())
    }

    async fn product_names(
        &mut self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, String>, RepositoryError> {
        Ok(self
            .staged
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| (p.id, p.name.clone()))
            .collect())
    }

    async fn decrement_stock(
        &mut self,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let drain = self.faults.drain_stock_on_decrement.load(Ordering::SeqCst);
        let Some(product) = self.staged.products.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        if drain {
            product.stock = 0;
        }
        if product.stock < quantity {
            return Ok(false);
        }
        product.stock -= quantity;
        self.staged.decrements.push(id);
        Ok(true)
    }

    async fn increment_stock(
        &mut self,
        id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if let Some(product) = self.staged.products.iter_mut().find(|p| p.id == id) {
            product.stock += quantity;
        }
        Ok(())
    }

    async fn find_cart(&mut self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .staged
            .carts
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn get_or_create_cart(&mut self, user_id: UserId) -> Result<Cart, RepositoryError> {
        if let Some(cart) = self.find_cart(user_id).await? {
            return Ok(cart);
        }
        let cart = Cart {
            id: CartId::new(self.staged.next_id()),
            user_id,
            created_at: Utc::now(),
        };
        self.staged.carts.push(cart.clone());
        Ok(cart)
    }

    async fn cart_lines(&mut self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        Ok(self
            .staged
            .cart_lines
            .iter()
            .filter(|l| l.cart_id == cart_id)
            .cloned()
            .collect())
    }

    async fn insert_cart_line(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        unit_price: Money,
    ) -> Result<CartLine, RepositoryError> {
        let duplicate = self
            .staged
            .cart_lines
            .iter()
            .any(|l| l.cart_id == cart_id && l.product_id == product_id);
        if duplicate {
            return Err(RepositoryError::Conflict(
                "product already in cart".to_string(),
            ));
        }
        let line = CartLine {
            id: CartLineId::new(self.staged.next_id()),
            cart_id,
            product_id,
            quantity,
            unit_price,
        };
        self.staged.cart_lines.push(line.clone());
        Ok(line)
    }

    async fn set_cart_line_quantity(
        &mut self,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let line = self
            .staged
            .cart_lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(RepositoryError::NotFound)?;
        line.quantity = quantity;
        Ok(line.clone())
    }

    async fn delete_cart_line(
        &mut self,
        cart_id: CartId,
        line_id: CartLineId,
    ) -> Result<bool, RepositoryError> {
        let before = self.staged.cart_lines.len();
        self.staged
            .cart_lines
            .retain(|l| !(l.id == line_id && l.cart_id == cart_id));
        Ok(self.staged.cart_lines.len() < before)
    }

    async fn clear_cart(&mut self, cart_id: CartId) -> Result<u64, RepositoryError> {
        let before = self.staged.cart_lines.len();
        self.staged.cart_lines.retain(|l| l.cart_id != cart_id);
        Ok((before - self.staged.cart_lines.len()) as u64)
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, RepositoryError> {
        let order = Order {
            id: OrderId::new(self.staged.next_id()),
            user_id: order.user_id,
            address_id: order.address_id,
            total: order.total,
            status: order.status,
            created_at: Utc::now(),
        };
        self.staged.orders.push(order.clone());
        Ok(order)
    }

    async fn insert_order_line(
        &mut self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: i32,
        unit_price: Money,
    ) -> Result<OrderLine, RepositoryError> {
        let line = OrderLine {
            id: OrderLineId::new(self.staged.next_id()),
            order_id,
            product_id: Some(product_id),
            quantity,
            unit_price,
        };
        self.staged.order_lines.push(line.clone());
        Ok(line)
    }

    async fn find_order(&mut self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.staged.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn transition_order(
        &mut self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let Some(order) = self
            .staged
            .orders
            .iter_mut()
            .find(|o| o.id == id && o.status == from)
        else {
            return Ok(None);
        };
        order.status = to;
        Ok(Some(order.clone()))
    }

    async fn list_orders(
        &mut self,
        user_id: Option<UserId>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .staged
            .orders
            .iter()
            .filter(|o| user_id.is_none_or(|u| o.user_id == u))
            .cloned()
            .collect();
        orders.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(orders)
    }

    async fn order_lines(
        &mut self,
        order_ids: &[OrderId],
    ) -> Result<Vec<OrderLine>, RepositoryError> {
        Ok(self
            .staged
            .order_lines
            .iter()
            .filter(|l| order_ids.contains(&l.order_id))
            .cloned()
            .collect())
    }

    async fn payments(&mut self, order_ids: &[OrderId]) -> Result<Vec<Payment>, RepositoryError> {
        Ok(self
            .staged
            .payments
            .iter()
            .filter(|p| order_ids.contains(&p.order_id))
            .cloned()
            .collect())
    }

    async fn insert_payment(&mut self, payment: NewPayment) -> Result<Payment, RepositoryError> {
        if self.faults.fail_payment_insert.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        if self.staged.payments.iter().any(|p| p.order_id == payment.order_id) {
            return Err(RepositoryError::Conflict(
                "order already has a payment".to_string(),
            ));
        }
        let payment = Payment {
            id: PaymentId::new(self.staged.next_id()),
            order_id: payment.order_id,
            payment_method_id: payment.payment_method_id,
            amount: payment.amount,
            status: payment.status,
            created_at: Utc::now(),
        };
        self.staged.payments.push(payment.clone());
        Ok(payment)
    }

    async fn daily_sales(&mut self) -> Result<Vec<DailySales>, RepositoryError> {
        let mut by_day = BTreeMap::new();
        for order in &self.staged.orders {
            if order.status == OrderStatus::Cancelled {
                continue;
            }
            let total = by_day
                .entry(order.created_at.date_naive())
                .or_insert(Money::ZERO);
            *total = *total + order.total;
        }
        Ok(by_day
            .into_iter()
            .map(|(date, total_sales)| DailySales { date, total_sales })
            .collect())
    }

    async fn commit(self) -> Result<(), RepositoryError> {
        let Self {
            mut guard, staged, ..
        } = self;
        *guard = staged;
        Ok(())
    }
}
