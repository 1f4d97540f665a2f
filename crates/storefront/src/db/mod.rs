//! Database access for the shop `PostgreSQL` database.
//!
//! # Tables (schema `shop`)
//!
//! - `customer` - Accounts (created by the CLI or an upstream registration service)
//! - `address` - Shipping addresses
//! - `payment_method` - Accepted ways of paying
//! - `category`, `product` - Catalog and stock counts
//! - `cart`, `cart_line` - One cart per customer
//! - `customer_order`, `order_line`, `payment` - Placed orders
//!
//! Sessions live in `tower_sessions.session`, managed by the session store.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p mercado-cli -- migrate
//! ```
//!
//! Repositories here cover the plain CRUD tables. Cart and order writes go
//! through [`crate::store`] so they can share one transaction.

pub mod addresses;
pub mod categories;
pub mod payment_methods;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use categories::CategoryRepository;
pub use payment_methods::PaymentMethodRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map unique and foreign key violations to `Conflict`.
///
/// `unique` and `foreign_key` are the messages reported for each kind of
/// violation. Anything else stays a `Database` error.
pub(crate) fn map_constraint_error(
    e: sqlx::Error,
    unique: &str,
    foreign_key: &str,
) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(unique.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict(foreign_key.to_owned());
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2.min(max_connections))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
