//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::store::PgStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    store: PgStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let store = PgStore::new(pool.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    ///
    /// Used by the catalog, address and payment-method repositories.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the transactional store used by the cart and order services.
    #[must_use]
    pub fn store(&self) -> &PgStore {
        &self.inner.store
    }
}
