//! Admin route handlers for order management and reporting.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use mercado_core::OrderId;

use super::JsonBody;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{DailySales, OrderView, StatusChange};
use crate::services::{CheckoutService, OrderQueryService};
use crate::state::AppState;

/// Move an order to a new status.
///
/// PATCH /api/v1/admin/orders/{id}/status
#[instrument(skip(state, body), fields(admin_id = %admin.id))]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
    JsonBody(body): JsonBody<StatusChange>,
) -> Result<Json<OrderView>> {
    let view = CheckoutService::new(state.store())
        .update_order_status(order_id, body.status)
        .await?;
    Ok(Json(view))
}

/// Sales totals per day.
///
/// GET /api/v1/admin/sales-by-date
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn sales_by_date(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<DailySales>>> {
    let sales = OrderQueryService::new(state.store())
        .sales_by_date(admin)
        .await?;
    Ok(Json(sales))
}
