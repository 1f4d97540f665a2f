//! Checkout workflow against a real `PostgreSQL` database.
//!
//! These tests exercise the row locks, guarded stock decrement and unique
//! payment constraint that only a real database provides.
//!
//! Run with: cargo test -p mercado-integration-tests -- --ignored

#![allow(clippy::indexing_slicing)]

use mercado_core::{Money, OrderStatus, PaymentStatus};
use mercado_storefront::db::ProductRepository;
use mercado_storefront::services::{CartService, CheckoutService, CommerceError};

use mercado_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires migrated database"]
async fn test_checkout_commits_everything() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let address = ctx.address(user).await;
    let method = ctx.payment_method().await;
    let yerba = ctx.product(Money::from_cents(1000), 5).await;
    let mate = ctx.product(Money::from_cents(500), 3).await;

    let cart = CartService::new(&ctx.store);
    cart.add_item(user.id, yerba, 2).await.expect("add yerba");
    cart.add_item(user.id, mate, 1).await.expect("add mate");

    let order = CheckoutService::new(&ctx.store)
        .finalize_checkout(user.id, address.id, method)
        .await
        .expect("checkout should succeed");

    assert_eq!(order.order.total, Money::from_cents(2500));
    assert_eq!(order.order.status, OrderStatus::Processing);
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.payments.len(), 1);
    assert_eq!(order.payments[0].status, PaymentStatus::Approved);
    assert_eq!(ctx.stock(yerba).await, 3);
    assert_eq!(ctx.stock(mate).await, 2);
    assert_eq!(cart.total(user.id).await.expect("total"), Money::ZERO);
}

#[tokio::test]
#[ignore = "Requires migrated database"]
async fn test_out_of_stock_leaves_nothing_behind() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let address = ctx.address(user).await;
    let method = ctx.payment_method().await;
    let product = ctx.product(Money::from_cents(1000), 1).await;

    let cart = CartService::new(&ctx.store);
    cart.add_item(user.id, product, 1).await.expect("add");

    sqlx::query("UPDATE shop.product SET stock = 0 WHERE id = $1")
        .bind(product)
        .execute(&ctx.pool)
        .await
        .expect("drain stock");

    let err = CheckoutService::new(&ctx.store)
        .finalize_checkout(user.id, address.id, method)
        .await
        .expect_err("checkout should fail");

    assert!(matches!(
        err,
        CommerceError::InsufficientStock { available: 0, .. }
    ));
    assert_eq!(ctx.stock(product).await, 0);
    assert_eq!(
        cart.total(user.id).await.expect("total"),
        Money::from_cents(1000)
    );

    let orders: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM shop.customer_order WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&ctx.pool)
            .await
            .expect("count orders");
    assert_eq!(orders, 0);
}

#[tokio::test]
#[ignore = "Requires migrated database"]
async fn test_last_unit_goes_to_exactly_one_buyer() {
    let ctx = TestContext::new().await;
    let method = ctx.payment_method().await;
    let product = ctx.product(Money::from_cents(700), 1).await;

    let mut buyers = Vec::new();
    for _ in 0..2 {
        let user = ctx.user().await;
        let address = ctx.address(user).await;
        CartService::new(&ctx.store)
            .add_item(user.id, product, 1)
            .await
            .expect("add");
        buyers.push((user, address));
    }

    let handles: Vec<_> = buyers
        .into_iter()
        .map(|(user, address)| {
            let store = ctx.store.clone();
            tokio::spawn(async move {
                CheckoutService::new(&store)
                    .finalize_checkout(user.id, address.id, method)
                    .await
            })
        })
        .collect();

    let mut won = 0;
    let mut lost = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => won += 1,
            Err(CommerceError::InsufficientStock { .. }) => lost += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!((won, lost), (1, 1));
    assert_eq!(ctx.stock(product).await, 0);
}

#[tokio::test]
#[ignore = "Requires migrated database"]
async fn test_pending_order_accepts_one_payment() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let address = ctx.address(user).await;
    let method = ctx.payment_method().await;
    let product = ctx.product(Money::from_cents(1200), 2).await;

    CartService::new(&ctx.store)
        .add_item(user.id, product, 2)
        .await
        .expect("add");

    let checkout = CheckoutService::new(&ctx.store);
    let pending = checkout
        .register_order_and_pay_later(user.id, address.id)
        .await
        .expect("register order");
    assert_eq!(pending.order.status, OrderStatus::Pending);
    assert!(pending.payments.is_empty());
    assert_eq!(ctx.stock(product).await, 0);

    let paid = checkout
        .submit_payment(pending.order.id, user.id, method)
        .await
        .expect("first payment");
    assert_eq!(paid.order.status, OrderStatus::Processing);
    assert_eq!(paid.payments[0].amount, Money::from_cents(2400));

    let err = checkout
        .submit_payment(pending.order.id, user.id, method)
        .await
        .expect_err("second payment must fail");
    assert!(matches!(err, CommerceError::Conflict(_)));
}

#[tokio::test]
#[ignore = "Requires migrated database"]
async fn test_opposite_order_carts_check_out_concurrently() {
    let ctx = TestContext::new().await;
    let method = ctx.payment_method().await;
    let first = ctx.product(Money::from_cents(300), 100).await;
    let second = ctx.product(Money::from_cents(400), 100).await;

    for _ in 0..20 {
        let mut buyers = Vec::new();
        for products in [[first, second], [second, first]] {
            let user = ctx.user().await;
            let address = ctx.address(user).await;
            let cart = CartService::new(&ctx.store);
            for product in products {
                cart.add_item(user.id, product, 1).await.expect("add");
            }
            buyers.push((user, address));
        }

        let handles: Vec<_> = buyers
            .into_iter()
            .map(|(user, address)| {
                let store = ctx.store.clone();
                tokio::spawn(async move {
                    CheckoutService::new(&store)
                        .finalize_checkout(user.id, address.id, method)
                        .await
                })
            })
            .collect();

        for handle in handles {
            let order = handle
                .await
                .expect("task panicked")
                .expect("checkout should succeed");
            assert_eq!(order.order.total, Money::from_cents(700));
        }
    }

    assert_eq!(ctx.stock(first).await, 60);
    assert_eq!(ctx.stock(second).await, 60);
}

#[tokio::test]
#[ignore = "Requires migrated database"]
async fn test_deleted_product_blocks_checkout() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let address = ctx.address(user).await;
    let method = ctx.payment_method().await;
    let kept = ctx.product(Money::from_cents(1000), 5).await;
    let gone = ctx.product(Money::from_cents(500), 3).await;

    let cart = CartService::new(&ctx.store);
    cart.add_item(user.id, kept, 2).await.expect("add kept");
    cart.add_item(user.id, gone, 1).await.expect("add gone");

    ProductRepository::new(&ctx.pool)
        .delete(gone)
        .await
        .expect("delete product");

    let err = CheckoutService::new(&ctx.store)
        .finalize_checkout(user.id, address.id, method)
        .await
        .expect_err("checkout should fail");

    match err {
        CommerceError::InsufficientStock {
            product_id,
            available,
            ..
        } => {
            assert_eq!(product_id, gone);
            assert_eq!(available, 0);
        }
        other => panic!("expected InsufficientStock, got {other}"),
    }
    assert_eq!(ctx.stock(kept).await, 5);
    assert_eq!(cart.view(user.id).await.expect("view").lines.len(), 2);
}
