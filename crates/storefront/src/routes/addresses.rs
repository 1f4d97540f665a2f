//! Address route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use mercado_core::AddressId;

use super::JsonBody;
use crate::db::AddressRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Address, NewAddress};
use crate::state::AppState;

/// List the caller's addresses.
///
/// GET /api/v1/addresses
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(addresses))
}

/// Add an address for the caller.
///
/// POST /api/v1/addresses
#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(body): JsonBody<NewAddress>,
) -> Result<(StatusCode, Json<Address>)> {
    body.validate().map_err(AppError::BadRequest)?;
    let address = AddressRepository::new(state.pool())
        .create(user.id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// Delete one of the caller's addresses.
///
/// DELETE /api/v1/addresses/{id}
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<StatusCode> {
    AddressRepository::new(state.pool())
        .delete(user.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
