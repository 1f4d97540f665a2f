//! Integration tests for Mercado.
//!
//! # Running Tests
//!
//! ```bash
//! # Create and migrate a test database
//! export MERCADO_DATABASE_URL=postgres://localhost/mercado_test
//! cargo run -p mercado-cli -- migrate
//!
//! # Start the storefront for the HTTP tests
//! cargo run -p mercado-storefront
//!
//! # Run the ignored tests
//! cargo test -p mercado-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `http` - Health checks and request handling against a running server
//! - `checkout` - Checkout workflow against a real `PostgreSQL` database
//! - `accounts` - Account maintenance used by the CLI

use reqwest::Client;
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use mercado_core::{Money, PaymentMethodId, ProductId};
use mercado_storefront::db::{
    self, AddressRepository, PaymentMethodRepository, ProductRepository, UserRepository,
};
use mercado_storefront::models::{Address, CurrentUser, NewAddress, NewProduct};
use mercado_storefront::store::PgStore;

/// Base URL of the running storefront (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("MERCADO_TEST_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client for tests against a running server.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A connection to the test database with fixture helpers.
///
/// Every fixture gets a unique name so tests can share one database and
/// run in parallel.
pub struct TestContext {
    pub pool: PgPool,
    pub store: PgStore,
}

impl TestContext {
    /// Connect to the database named by `MERCADO_DATABASE_URL`.
    ///
    /// # Panics
    ///
    /// Panics if the variable is missing or the database is unreachable.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();
        let url = std::env::var("MERCADO_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("MERCADO_DATABASE_URL must point at a migrated test database");

        let pool = db::create_pool(&SecretString::from(url), 10)
            .await
            .expect("Failed to connect to test database");
        let store = PgStore::new(pool.clone());

        Self { pool, store }
    }

    /// Create a customer account.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn user(&self) -> CurrentUser {
        let tag = Uuid::new_v4().simple().to_string();
        let user = UserRepository::new(&self.pool)
            .create(&format!("user-{tag}"), &format!("{tag}@example.com"), false)
            .await
            .expect("Failed to create user");
        CurrentUser {
            id: user.id,
            is_admin: false,
        }
    }

    /// Create an address for `user`.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn address(&self, user: CurrentUser) -> Address {
        let input = NewAddress {
            street: "Av. Pellegrini 1200".to_string(),
            city: "Rosario".to_string(),
            zip_code: "2000".to_string(),
        };
        AddressRepository::new(&self.pool)
            .create(user.id, &input)
            .await
            .expect("Failed to create address")
    }

    /// Create a payment method with a unique name.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn payment_method(&self) -> PaymentMethodId {
        PaymentMethodRepository::new(&self.pool)
            .create(&format!("card-{}", Uuid::new_v4().simple()))
            .await
            .expect("Failed to create payment method")
            .id
    }

    /// Create a product with a unique name.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn product(&self, price: Money, stock: i32) -> ProductId {
        let input = NewProduct {
            name: format!("product-{}", Uuid::new_v4().simple()),
            description: String::new(),
            price,
            stock,
            image_url: None,
            category_id: None,
        };
        ProductRepository::new(&self.pool)
            .create(&input)
            .await
            .expect("Failed to create product")
            .id
    }

    /// Current stock of a product.
    ///
    /// # Panics
    ///
    /// Panics if the product does not exist.
    pub async fn stock(&self, id: ProductId) -> i32 {
        ProductRepository::new(&self.pool)
            .get(id)
            .await
            .expect("Product should exist")
            .stock
    }
}
