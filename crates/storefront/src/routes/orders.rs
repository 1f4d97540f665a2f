//! Checkout and order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use mercado_core::{AddressId, OrderId, PaymentMethodId};

use super::JsonBody;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::OrderView;
use crate::services::{CheckoutService, OrderQueryService};
use crate::state::AppState;

/// Body of `POST /checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub address_id: AddressId,
    pub payment_method_id: PaymentMethodId,
}

/// Body of `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub address_id: AddressId,
}

/// Body of `POST /orders/{id}/payment`.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub payment_method_id: PaymentMethodId,
}

/// Turn the caller's cart into a paid order.
///
/// POST /api/v1/checkout
#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(body): JsonBody<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderView>)> {
    let view = CheckoutService::new(state.store())
        .finalize_checkout(user.id, body.address_id, body.payment_method_id)
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", &view.order.id.to_string())]),
    );
    Ok((StatusCode::CREATED, Json(view)))
}

/// Turn the caller's cart into a pending order to be paid later.
///
/// POST /api/v1/orders
#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(body): JsonBody<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>)> {
    let view = CheckoutService::new(state.store())
        .register_order_and_pay_later(user.id, body.address_id)
        .await?;

    add_breadcrumb(
        "checkout",
        "Order registered for later payment",
        Some(&[("order_id", &view.order.id.to_string())]),
    );
    Ok((StatusCode::CREATED, Json(view)))
}

/// Pay one of the caller's pending orders.
///
/// POST /api/v1/orders/{id}/payment
#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn submit_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
    JsonBody(body): JsonBody<PaymentRequest>,
) -> Result<Json<OrderView>> {
    let view = CheckoutService::new(state.store())
        .submit_payment(order_id, user.id, body.payment_method_id)
        .await?;
    Ok(Json(view))
}

/// List the caller's orders, or every order for admins.
///
/// GET /api/v1/orders
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderQueryService::new(state.store())
        .list_orders_for_user(user)
        .await?;
    Ok(Json(orders))
}

/// Show one order with its lines and payments.
///
/// GET /api/v1/orders/{id}
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let view = OrderQueryService::new(state.store())
        .get_order_detail(order_id, user)
        .await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{anonymous, as_user, expect_error, send};

    #[tokio::test]
    async fn test_checkout_requires_auth() {
        let response = send(
            anonymous(),
            "POST",
            "/api/v1/checkout",
            Some(r#"{"address_id": 1, "payment_method_id": 1}"#),
        )
        .await;
        expect_error(response, StatusCode::UNAUTHORIZED).await;
    }

    #[tokio::test]
    async fn test_checkout_requires_payment_method() {
        let response = send(
            as_user(1, false),
            "POST",
            "/api/v1/checkout",
            Some(r#"{"address_id": 1}"#),
        )
        .await;
        let body = expect_error(response, StatusCode::BAD_REQUEST).await;
        assert_eq!(body["error"], "validation");
    }

    #[tokio::test]
    async fn test_order_listing_requires_auth() {
        let response = send(anonymous(), "GET", "/api/v1/orders", None).await;
        expect_error(response, StatusCode::UNAUTHORIZED).await;
    }
}
