//! HTTP route handlers for the shop API.
//!
//! # Route Structure
//!
//! All API routes are nested under `/api/v1` and speak JSON.
//!
//! ```text
//! GET    /health                    - Liveness (outside `/api/v1`)
//! GET    /health/ready              - Readiness, checks the database
//!
//! # Cart (requires auth)
//! GET    /cart                      - Cart with lines and total
//! GET    /cart/total                - Cart total only
//! POST   /cart/items                - Add a product
//! PATCH  /cart/items/{line_id}      - Change a line's quantity
//! DELETE /cart/items/{line_id}      - Remove a line
//! DELETE /cart                      - Empty the cart
//!
//! # Orders (requires auth)
//! POST   /checkout                  - Cart to paid order
//! POST   /orders                    - Cart to pending order (pay later)
//! POST   /orders/{id}/payment       - Pay a pending order
//! GET    /orders                    - Own orders (all orders for admins)
//! GET    /orders/{id}               - Order detail
//!
//! # Admin
//! PATCH  /admin/orders/{id}/status  - Move an order through its lifecycle
//! GET    /admin/sales-by-date       - Daily sales totals
//!
//! # Catalog (reads are public, writes require admin)
//! GET|POST             /categories
//! GET|PATCH|DELETE     /categories/{id}
//! GET|POST             /products
//! GET|PATCH|DELETE     /products/{id}
//!
//! # Account data (requires auth)
//! GET|POST             /addresses
//! DELETE               /addresses/{id}
//! GET|POST             /payment-methods  (POST requires admin)
//! ```

pub mod addresses;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod payment_methods;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
    routing::{get, patch, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// JSON request body whose rejection renders like every other API error.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/total", get(cart::total))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{line_id}",
            patch(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::place_order))
        .route("/{id}", get(orders::show))
        .route("/{id}/payment", post(orders::submit_payment))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}/status", patch(admin::update_order_status))
        .route("/sales-by-date", get(admin::sales_by_date))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/{id}",
            get(catalog::show_category)
                .patch(catalog::rename_category)
                .delete(catalog::delete_category),
        )
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::show_product)
                .patch(catalog::update_product)
                .delete(catalog::delete_product),
        )
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route("/{id}", axum::routing::delete(addresses::delete))
}

/// Create the payment method routes router.
pub fn payment_method_routes() -> Router<AppState> {
    Router::new().route("/", get(payment_methods::index).post(payment_methods::create))
}

/// Create the health check routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Create all API routes, to be nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .route("/checkout", post(orders::checkout))
        .nest("/orders", order_routes())
        .nest("/admin", admin_routes())
        .merge(catalog_routes())
        .nest("/addresses", address_routes())
        .nest("/payment-methods", payment_method_routes())
}


#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::test_support::{anonymous, send};

    #[tokio::test]
    async fn test_liveness_does_not_touch_the_database() {
        let response = send(anonymous(), "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = send(anonymous(), "GET", "/api/v1/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
