//! Payment method route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use super::JsonBody;
use crate::db::PaymentMethodRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{NewPaymentMethod, PaymentMethod};
use crate::state::AppState;

/// List the accepted payment methods.
///
/// GET /api/v1/payment-methods
#[instrument(skip(state, _user))]
pub async fn index(
    State(state): State<AppState>,
    _user: RequireAuth,
) -> Result<Json<Vec<PaymentMethod>>> {
    let methods = PaymentMethodRepository::new(state.pool()).list().await?;
    Ok(Json(methods))
}

/// Add a payment method.
///
/// POST /api/v1/payment-methods
#[instrument(skip(state, body), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(body): JsonBody<NewPaymentMethod>,
) -> Result<(StatusCode, Json<PaymentMethod>)> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(
            "payment method name cannot be empty".to_string(),
        ));
    }
    let method = PaymentMethodRepository::new(state.pool())
        .create(name)
        .await?;
    Ok((StatusCode::CREATED, Json(method)))
}
