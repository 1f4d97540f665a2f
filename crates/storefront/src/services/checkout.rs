//! Checkout and order finalization.
//!
//! Turning a cart into an order happens inside one unit of work: the order,
//! its lines, the stock decrements, the payment and the emptied cart are
//! committed together or not at all. Stock is checked twice. The first pass
//! reports a friendly error before anything is written; the guarded
//! decrement inside the write is the one that actually holds under
//! concurrency.

use std::collections::HashMap;

use tracing::instrument;

use mercado_core::{
    AddressId, Money, OrderId, OrderStatus, PaymentMethodId, PaymentStatus, ProductId, UserId,
};

use super::CommerceError;
use super::cart::product_name;
use crate::models::cart::cart_total;
use crate::models::order::referenced_products;
use crate::models::{Cart, CartLine, NewOrder, NewPayment, Order, OrderLine, OrderView};
use crate::store::{Store, UnitOfWork};

/// Order creation, payment and status changes over a [`Store`].
pub struct CheckoutService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> CheckoutService<'a, S> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Turn the user's cart into a paid order.
    ///
    /// On success the order is `processing`, carries one `approved` payment
    /// for the full total, stock has been taken out and the cart is empty.
    /// On any failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::EmptyCart` if the user has no cart lines.
    /// Returns `CommerceError::NotFound` if the address is not the user's or
    /// the payment method does not exist.
    /// Returns `CommerceError::InsufficientStock` naming the first line that
    /// cannot be filled.
    /// Returns `CommerceError::Transaction` if a write fails.
    #[instrument(
        skip(self),
        fields(user_id = %user_id, address_id = %address_id, payment_method_id = %payment_method_id)
    )]
    pub async fn finalize_checkout(
        &self,
        user_id: UserId,
        address_id: AddressId,
        payment_method_id: PaymentMethodId,
    ) -> Result<OrderView, CommerceError> {
        let mut tx = self.store.begin().await?;

        let (cart, lines) = load_cart(&mut tx, user_id).await?;
        tx.find_address(user_id, address_id)
            .await?
            .ok_or(CommerceError::NotFound("address"))?;
        let method = tx
            .find_payment_method(payment_method_id)
            .await?
            .ok_or(CommerceError::NotFound("payment method"))?;
        let names = check_stock(&mut tx, &lines).await?;
        let total = cart_total(&lines);

        let order = tx
            .insert_order(NewOrder {
                user_id,
                address_id,
                total,
                status: OrderStatus::Processing,
            })
            .await
            .map_err(CommerceError::Transaction)?;
        let order_lines = write_lines(&mut tx, &order, &lines).await?;
        let payment = tx
            .insert_payment(NewPayment {
                order_id: order.id,
                payment_method_id: method.id,
                amount: total,
                status: PaymentStatus::Approved,
            })
            .await
            .map_err(CommerceError::Transaction)?;
        tx.clear_cart(cart.id)
            .await
            .map_err(CommerceError::Transaction)?;
        tx.commit().await.map_err(CommerceError::Transaction)?;

        tracing::info!(
            order_id = %order.id,
            total = %total,
            lines = order_lines.len(),
            "Order placed"
        );
        Ok(OrderView::new(order, order_lines, vec![payment], &names))
    }

    /// Turn the user's cart into a `pending` order to be paid later.
    ///
    /// Stock is reserved and the cart emptied exactly as in
    /// [`finalize_checkout`](Self::finalize_checkout), but no payment is
    /// recorded.
    ///
    /// # Errors
    ///
    /// Same as [`finalize_checkout`](Self::finalize_checkout), minus the
    /// payment method check.
    #[instrument(skip(self), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn register_order_and_pay_later(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<OrderView, CommerceError> {
        let mut tx = self.store.begin().await?;

        let (cart, lines) = load_cart(&mut tx, user_id).await?;
        tx.find_address(user_id, address_id)
            .await?
            .ok_or(CommerceError::NotFound("address"))?;
        let names = check_stock(&mut tx, &lines).await?;
        let total = cart_total(&lines);

        let order = tx
            .insert_order(NewOrder {
                user_id,
                address_id,
                total,
                status: OrderStatus::Pending,
            })
            .await
            .map_err(CommerceError::Transaction)?;
        let order_lines = write_lines(&mut tx, &order, &lines).await?;
        tx.clear_cart(cart.id)
            .await
            .map_err(CommerceError::Transaction)?;
        tx.commit().await.map_err(CommerceError::Transaction)?;

        tracing::info!(order_id = %order.id, total = %total, "Order registered for later payment");
        Ok(OrderView::new(order, order_lines, Vec::new(), &names))
    }

    /// Pay for a `pending` order and move it to `processing`.
    ///
    /// The status change only applies while the order is still pending and
    /// an order holds at most one payment, so of two concurrent submissions
    /// only one can succeed.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the order does not exist or
    /// belongs to someone else, or the payment method does not exist.
    /// Returns `CommerceError::Conflict` if the order is not pending.
    #[instrument(skip(self), fields(order_id = %order_id, user_id = %requester))]
    pub async fn submit_payment(
        &self,
        order_id: OrderId,
        requester: UserId,
        payment_method_id: PaymentMethodId,
    ) -> Result<OrderView, CommerceError> {
        let mut tx = self.store.begin().await?;

        let order = tx
            .find_order(order_id)
            .await?
            .filter(|o| o.user_id == requester)
            .ok_or(CommerceError::NotFound("order"))?;
        let method = tx
            .find_payment_method(payment_method_id)
            .await?
            .ok_or(CommerceError::NotFound("payment method"))?;
        if order.status != OrderStatus::Pending {
            return Err(not_pending(&order));
        }

        let order = tx
            .transition_order(order_id, OrderStatus::Pending, OrderStatus::Processing)
            .await?
            .ok_or_else(|| not_pending(&order))?;
        let payment = tx
            .insert_payment(NewPayment {
                order_id,
                payment_method_id: method.id,
                amount: order.total,
                status: PaymentStatus::Approved,
            })
            .await?;

        let lines = tx.order_lines(&[order_id]).await?;
        let names = tx.product_names(&referenced_products(&lines)).await?;
        tx.commit().await.map_err(CommerceError::Transaction)?;

        tracing::info!(order_id = %order_id, amount = %payment.amount, "Payment submitted");
        Ok(OrderView::new(order, lines, vec![payment], &names))
    }

    /// Change an order's status (admin operation).
    ///
    /// Cancelling returns the order's units to stock in the same unit of
    /// work.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the order does not exist.
    /// Returns `CommerceError::Conflict` if the transition is not allowed.
    #[instrument(skip(self), fields(order_id = %order_id, status = %new_status))]
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<OrderView, CommerceError> {
        let mut tx = self.store.begin().await?;

        let order = tx
            .find_order(order_id)
            .await?
            .ok_or(CommerceError::NotFound("order"))?;
        if !order.status.can_transition_to(new_status) {
            return Err(CommerceError::Conflict(format!(
                "order {order_id} cannot go from {} to {new_status}",
                order.status
            )));
        }

        let updated = tx
            .transition_order(order_id, order.status, new_status)
            .await?
            .ok_or_else(|| {
                CommerceError::Conflict(format!("order {order_id} was changed concurrently"))
            })?;

        let lines = tx.order_lines(&[order_id]).await?;
        if new_status == OrderStatus::Cancelled {
            let mut restock: Vec<_> = lines
                .iter()
                .filter_map(|l| l.product_id.map(|id| (id, l.quantity)))
                .collect();
            restock.sort_unstable();
            for (product_id, quantity) in restock {
                tx.increment_stock(product_id, quantity)
                    .await
                    .map_err(CommerceError::Transaction)?;
            }
        }
        let payments = tx.payments(&[order_id]).await?;
        let names = tx.product_names(&referenced_products(&lines)).await?;
        tx.commit().await.map_err(CommerceError::Transaction)?;

        tracing::info!(
            order_id = %order_id,
            from = %order.status,
            to = %new_status,
            "Order status changed"
        );
        Ok(OrderView::new(updated, lines, payments, &names))
    }
}

fn not_pending(order: &Order) -> CommerceError {
    CommerceError::Conflict(format!(
        "order {} is {}, only pending orders accept payment",
        order.id, order.status
    ))
}

/// The user's cart and its lines. No cart and no lines both count as empty.
///
/// Lines come back ordered by product ID. Stock rows are locked in that
/// order, so two checkouts over the same products never wait on each other
/// in a cycle.
async fn load_cart<T: UnitOfWork>(
    tx: &mut T,
    user_id: UserId,
) -> Result<(Cart, Vec<CartLine>), CommerceError> {
    let cart = tx
        .find_cart(user_id)
        .await?
        .ok_or(CommerceError::EmptyCart)?;
    let mut lines = tx.cart_lines(cart.id).await?;
    if lines.is_empty() {
        return Err(CommerceError::EmptyCart);
    }
    lines.sort_by_key(|l| l.product_id);
    Ok((cart, lines))
}

/// Check every line against current stock before anything is written.
///
/// A product that no longer exists counts as having no stock. Returns the
/// names of the products, for the order view.
async fn check_stock<T: UnitOfWork>(
    tx: &mut T,
    lines: &[CartLine],
) -> Result<HashMap<ProductId, String>, CommerceError> {
    let mut names = HashMap::with_capacity(lines.len());
    for line in lines {
        let product = tx.find_product(line.product_id).await?;
        let available = product.as_ref().map_or(0, |p| p.stock);
        let name = product_name(product.map(|p| p.name), line.product_id);
        if line.quantity > available {
            return Err(CommerceError::InsufficientStock {
                product_id: line.product_id,
                product_name: name,
                requested: line.quantity,
                available,
            });
        }
        names.insert(line.product_id, name);
    }
    Ok(names)
}

/// Copy cart lines into the order and take their units out of stock.
async fn write_lines<T: UnitOfWork>(
    tx: &mut T,
    order: &Order,
    lines: &[CartLine],
) -> Result<Vec<OrderLine>, CommerceError> {
    let mut order_lines = Vec::with_capacity(lines.len());
    for line in lines {
        let order_line = tx
            .insert_order_line(order.id, line.product_id, line.quantity, line.unit_price)
            .await
            .map_err(CommerceError::Transaction)?;

        if !tx
            .decrement_stock(line.product_id, line.quantity)
            .await
            .map_err(CommerceError::Transaction)?
        {
            let product = tx
                .find_product(line.product_id)
                .await
                .map_err(CommerceError::Transaction)?;
            tracing::warn!(
                order_id = %order.id,
                product_id = %line.product_id,
                "Stock ran out during checkout"
            );
            return Err(CommerceError::InsufficientStock {
                product_id: line.product_id,
                available: product.as_ref().map_or(0, |p| p.stock),
                product_name: product_name(product.map(|p| p.name), line.product_id),
                requested: line.quantity,
            });
        }
        order_lines.push(order_line);
    }
    Ok(order_lines)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::CartService;
    use crate::store::memory::MemoryStore;

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    struct Shop {
        store: MemoryStore,
        a: ProductId,
        b: ProductId,
        address: AddressId,
        card: PaymentMethodId,
    }

    /// Product A at 10.00 (stock 5), B at 5.00 (stock 3), and a cart with
    /// 2 x A and 1 x B.
    async fn scenario() -> Shop {
        let store = MemoryStore::new();
        let a = store.add_product("A", Money::from_cents(1000), 5).await;
        let b = store.add_product("B", Money::from_cents(500), 3).await;
        let address = store.add_address(ALICE).await;
        let card = store.add_payment_method("credit card").await;

        let cart = CartService::new(&store);
        cart.add_item(ALICE, a, 2).await.unwrap();
        cart.add_item(ALICE, b, 1).await.unwrap();

        Shop {
            store,
            a,
            b,
            address,
            card,
        }
    }

    #[tokio::test]
    async fn test_checkout_creates_order_payment_and_empties_cart() {
        let shop = scenario().await;
        let service = CheckoutService::new(&shop.store);

        let view = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap();

        assert_eq!(view.order.total, Money::from_cents(2500));
        assert_eq!(view.order.status, OrderStatus::Processing);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.payments.len(), 1);
        assert_eq!(view.payments[0].amount, Money::from_cents(2500));
        assert_eq!(view.payments[0].status, PaymentStatus::Approved);
        assert_eq!(view.lines[0].product_name.as_deref(), Some("A"));

        let tables = shop.store.snapshot().await;
        assert_eq!(tables.orders.len(), 1);
        assert_eq!(tables.payments.len(), 1);
        assert_eq!(tables.order_lines.len(), 2);
        assert_eq!(tables.stock(shop.a), 3);
        assert_eq!(tables.stock(shop.b), 2);
        assert!(tables.lines_in_cart_of(ALICE).is_empty());
    }

    #[tokio::test]
    async fn test_out_of_stock_line_fails_without_changes() {
        let shop = scenario().await;
        shop.store.set_stock(shop.b, 0).await;
        let service = CheckoutService::new(&shop.store);

        let err = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap_err();

        match err {
            CommerceError::InsufficientStock {
                product_id,
                product_name,
                available,
                ..
            } => {
                assert_eq!(product_id, shop.b);
                assert_eq!(product_name, "B");
                assert_eq!(available, 0);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let tables = shop.store.snapshot().await;
        assert_eq!(tables.stock(shop.a), 5);
        assert!(tables.orders.is_empty());
        assert!(tables.payments.is_empty());
        assert_eq!(tables.lines_in_cart_of(ALICE).len(), 2);
    }

    #[tokio::test]
    async fn test_total_uses_snapshot_prices() {
        let shop = scenario().await;
        shop.store.set_price(shop.a, Money::from_cents(9900)).await;
        let service = CheckoutService::new(&shop.store);

        let view = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap();

        let summed: Money = view
            .lines
            .iter()
            .map(|l| l.unit_price.times(l.quantity))
            .sum();
        assert_eq!(view.order.total, summed);
        assert_eq!(view.order.total, Money::from_cents(2500));
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let store = MemoryStore::new();
        let address = store.add_address(ALICE).await;
        let card = store.add_payment_method("cash").await;
        let service = CheckoutService::new(&store);

        // No cart at all
        let err = service
            .finalize_checkout(ALICE, address, card)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));

        // A cart with no lines
        CartService::new(&store)
            .get_or_create_cart(ALICE)
            .await
            .unwrap();
        let err = service
            .finalize_checkout(ALICE, address, card)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
    }

    #[tokio::test]
    async fn test_address_must_belong_to_user() {
        let shop = scenario().await;
        let bobs_address = shop.store.add_address(BOB).await;
        let service = CheckoutService::new(&shop.store);

        let err = service
            .finalize_checkout(ALICE, bobs_address, shop.card)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::NotFound("address")));
    }

    #[tokio::test]
    async fn test_unknown_payment_method_is_not_found() {
        let shop = scenario().await;
        let service = CheckoutService::new(&shop.store);

        let err = service
            .finalize_checkout(ALICE, shop.address, PaymentMethodId::new(999))
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::NotFound("payment method")));
        assert_eq!(shop.store.snapshot().await.stock(shop.a), 5);
    }

    #[tokio::test]
    async fn test_failed_payment_write_rolls_back_everything() {
        let shop = scenario().await;
        shop.store.fail_payment_insert();
        let service = CheckoutService::new(&shop.store);

        let err = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::Transaction(_)));

        let tables = shop.store.snapshot().await;
        assert!(tables.orders.is_empty());
        assert!(tables.order_lines.is_empty());
        assert!(tables.payments.is_empty());
        assert_eq!(tables.stock(shop.a), 5);
        assert_eq!(tables.stock(shop.b), 3);
        assert_eq!(tables.lines_in_cart_of(ALICE).len(), 2);
    }

    #[tokio::test]
    async fn test_stock_taken_after_validation_fails_the_guarded_decrement() {
        let shop = scenario().await;
        shop.store.drain_stock_on_decrement();
        let service = CheckoutService::new(&shop.store);

        let err = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InsufficientStock { available: 0, .. }
        ));

        let tables = shop.store.snapshot().await;
        assert!(tables.orders.is_empty());
        assert_eq!(tables.stock(shop.a), 5);
        assert_eq!(tables.lines_in_cart_of(ALICE).len(), 2);
    }

    #[tokio::test]
    async fn test_deleted_product_in_cart_fails_without_changes() {
        let shop = scenario().await;
        shop.store.delete_product(shop.b).await;
        let service = CheckoutService::new(&shop.store);

        let err = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap_err();

        match err {
            CommerceError::InsufficientStock {
                product_id,
                product_name,
                requested,
                available,
            } => {
                assert_eq!(product_id, shop.b);
                assert_eq!(product_name, format!("product #{}", shop.b));
                assert_eq!(requested, 1);
                assert_eq!(available, 0);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let tables = shop.store.snapshot().await;
        assert!(tables.orders.is_empty());
        assert_eq!(tables.stock(shop.a), 5);
        assert_eq!(tables.lines_in_cart_of(ALICE).len(), 2);
    }

    #[tokio::test]
    async fn test_stock_is_taken_in_product_order() {
        let store = MemoryStore::new();
        let first = store.add_product("First", Money::from_cents(100), 10).await;
        let second = store.add_product("Second", Money::from_cents(200), 10).await;
        let third = store.add_product("Third", Money::from_cents(300), 10).await;
        let address = store.add_address(ALICE).await;
        let card = store.add_payment_method("credit card").await;

        let cart = CartService::new(&store);
        for product in [third, first, second] {
            cart.add_item(ALICE, product, 1).await.unwrap();
        }

        let view = CheckoutService::new(&store)
            .finalize_checkout(ALICE, address, card)
            .await
            .unwrap();
        assert_eq!(view.order.total, Money::from_cents(600));

        let tables = store.snapshot().await;
        assert_eq!(tables.decrements, vec![first, second, third]);
    }

    /// Units of work on the memory store never overlap, so the later
    /// checkout sees the product already sold out. The interleaved case is
    /// `test_stock_taken_after_validation_fails_the_guarded_decrement`.
    #[tokio::test]
    async fn test_second_checkout_for_last_unit_sees_it_sold_out() {
        let store = MemoryStore::new();
        let last = store.add_product("Last one", Money::from_cents(4200), 1).await;
        let card = store.add_payment_method("credit card").await;
        let alice_address = store.add_address(ALICE).await;
        let bob_address = store.add_address(BOB).await;

        let cart = CartService::new(&store);
        cart.add_item(ALICE, last, 1).await.unwrap();
        cart.add_item(BOB, last, 1).await.unwrap();

        let service = CheckoutService::new(&store);
        let (first, second) = tokio::join!(
            service.finalize_checkout(ALICE, alice_address, card),
            service.finalize_checkout(BOB, bob_address, card),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(CommerceError::InsufficientStock { available: 0, .. })
        )));

        let tables = store.snapshot().await;
        assert_eq!(tables.stock(last), 0);
        assert_eq!(tables.orders.len(), 1);
        assert_eq!(tables.payments.len(), 1);
    }

    #[tokio::test]
    async fn test_pay_later_then_pay_once() {
        let shop = scenario().await;
        let service = CheckoutService::new(&shop.store);

        let pending = service
            .register_order_and_pay_later(ALICE, shop.address)
            .await
            .unwrap();
        assert_eq!(pending.order.status, OrderStatus::Pending);
        assert!(pending.payments.is_empty());

        let tables = shop.store.snapshot().await;
        assert_eq!(tables.stock(shop.a), 3);
        assert!(tables.lines_in_cart_of(ALICE).is_empty());
        assert!(tables.payments.is_empty());

        let paid = service
            .submit_payment(pending.order.id, ALICE, shop.card)
            .await
            .unwrap();
        assert_eq!(paid.order.status, OrderStatus::Processing);
        assert_eq!(paid.payments.len(), 1);
        assert_eq!(paid.payments[0].amount, pending.order.total);
        assert_eq!(paid.lines.len(), 2);

        let err = service
            .submit_payment(pending.order.id, ALICE, shop.card)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::Conflict(_)));
        assert_eq!(shop.store.snapshot().await.payments.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_payment_for_someone_elses_order_is_not_found() {
        let shop = scenario().await;
        let service = CheckoutService::new(&shop.store);
        let pending = service
            .register_order_and_pay_later(ALICE, shop.address)
            .await
            .unwrap();

        let err = service
            .submit_payment(pending.order.id, BOB, shop.card)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::NotFound("order")));

        let err = service
            .submit_payment(OrderId::new(999), ALICE, shop.card)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::NotFound("order")));
    }

    #[tokio::test]
    async fn test_cancelling_returns_stock() {
        let shop = scenario().await;
        let service = CheckoutService::new(&shop.store);
        let placed = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap();

        let cancelled = service
            .update_order_status(placed.order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.payments.len(), 1);

        let tables = shop.store.snapshot().await;
        assert_eq!(tables.stock(shop.a), 5);
        assert_eq!(tables.stock(shop.b), 3);
    }

    #[tokio::test]
    async fn test_disallowed_status_change_is_conflict() {
        let shop = scenario().await;
        let service = CheckoutService::new(&shop.store);
        let placed = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap();

        service
            .update_order_status(placed.order.id, OrderStatus::Completed)
            .await
            .unwrap();
        let err = service
            .update_order_status(placed.order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::Conflict(_)));

        let err = service
            .update_order_status(OrderId::new(999), OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::NotFound("order")));
        assert_eq!(shop.store.snapshot().await.stock(shop.a), 3);
    }

    #[tokio::test]
    async fn test_order_view_survives_product_deletion() {
        let shop = scenario().await;
        let service = CheckoutService::new(&shop.store);
        let placed = service
            .finalize_checkout(ALICE, shop.address, shop.card)
            .await
            .unwrap();

        shop.store.delete_product(shop.a).await;
        let view = service
            .update_order_status(placed.order.id, OrderStatus::Shipped)
            .await
            .unwrap();

        let orphan = view.lines.iter().find(|l| l.product_id.is_none()).unwrap();
        assert_eq!(orphan.product_name, None);
        assert_eq!(orphan.unit_price, Money::from_cents(1000));
    }
}
