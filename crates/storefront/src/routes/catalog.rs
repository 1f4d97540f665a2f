//! Catalog route handlers: categories and products.
//!
//! Reads are public. Writes require an admin.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use mercado_core::{CategoryId, ProductId};

use super::JsonBody;
use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Category, NewCategory, NewProduct, Product, ProductFilter, ProductPatch};
use crate::state::AppState;

fn category_name(input: &NewCategory) -> Result<&str> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(
            "category name cannot be empty".to_string(),
        ));
    }
    Ok(name)
}

// =============================================================================
// Categories
// =============================================================================

/// GET /api/v1/categories
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// GET /api/v1/categories/{id}
#[instrument(skip(state))]
pub async fn show_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>> {
    let category = CategoryRepository::new(state.pool()).get(id).await?;
    Ok(Json(category))
}

/// POST /api/v1/categories
#[instrument(skip(state, body), fields(admin_id = %admin.id))]
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(body): JsonBody<NewCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    let name = category_name(&body)?;
    let category = CategoryRepository::new(state.pool()).create(name).await?;
    tracing::info!(category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH /api/v1/categories/{id}
#[instrument(skip(state, body), fields(admin_id = %admin.id))]
pub async fn rename_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    JsonBody(body): JsonBody<NewCategory>,
) -> Result<Json<Category>> {
    let name = category_name(&body)?;
    let category = CategoryRepository::new(state.pool())
        .rename(id, name)
        .await?;
    Ok(Json(category))
}

/// DELETE /api/v1/categories/{id}
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    CategoryRepository::new(state.pool()).delete(id).await?;
    tracing::info!(category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Products
// =============================================================================

/// GET /api/v1/products?category_id=N
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// GET /api/v1/products/{id}
#[instrument(skip(state))]
pub async fn show_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool()).get(id).await?;
    Ok(Json(product))
}

/// POST /api/v1/products
#[instrument(skip(state, body), fields(admin_id = %admin.id))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(body): JsonBody<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    body.validate().map_err(AppError::BadRequest)?;
    let product = ProductRepository::new(state.pool()).create(&body).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /api/v1/products/{id}
#[instrument(skip(state, body), fields(admin_id = %admin.id))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    JsonBody(body): JsonBody<ProductPatch>,
) -> Result<Json<Product>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("nothing to update".to_string()));
    }
    body.validate().map_err(AppError::BadRequest)?;
    let product = ProductRepository::new(state.pool())
        .update(id, &body)
        .await?;
    Ok(Json(product))
}

/// DELETE /api/v1/products/{id}
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool()).delete(id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
