//! Cart route handlers.
//!
//! Every handler acts on the caller's own cart; line IDs from another
//! user's cart are reported as not found.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mercado_core::{CartLineId, Money, ProductId};

use super::JsonBody;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CartLine, CartView};
use crate::services::CartService;
use crate::state::AppState;

/// Body of `POST /cart/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Body of `PATCH /cart/items/{line_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// Response of `GET /cart/total`.
#[derive(Debug, Serialize)]
pub struct CartTotal {
    pub total: Money,
}

/// Show the caller's cart.
///
/// GET /api/v1/cart
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    let view = CartService::new(state.store()).view(user.id).await?;
    Ok(Json(view))
}

/// The caller's cart total.
///
/// GET /api/v1/cart/total
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn total(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartTotal>> {
    let total = CartService::new(state.store()).total(user.id).await?;
    Ok(Json(CartTotal { total }))
}

/// Add a product to the caller's cart.
///
/// POST /api/v1/cart/items
#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(body): JsonBody<AddItemRequest>,
) -> Result<(StatusCode, Json<CartLine>)> {
    let line = CartService::new(state.store())
        .add_item(user.id, body.product_id, body.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// Change the quantity of one of the caller's cart lines.
///
/// PATCH /api/v1/cart/items/{line_id}
#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(line_id): Path<CartLineId>,
    JsonBody(body): JsonBody<UpdateQuantityRequest>,
) -> Result<Json<CartLine>> {
    let line = CartService::new(state.store())
        .update_item_quantity(user.id, line_id, body.quantity)
        .await?;
    Ok(Json(line))
}

/// Remove one of the caller's cart lines.
///
/// DELETE /api/v1/cart/items/{line_id}
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(line_id): Path<CartLineId>,
) -> Result<StatusCode> {
    CartService::new(state.store())
        .remove_item(user.id, line_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Empty the caller's cart.
///
/// DELETE /api/v1/cart
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode> {
    CartService::new(state.store()).clear_cart(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
