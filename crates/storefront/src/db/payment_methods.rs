//! Payment method repository.

use sqlx::PgPool;

use mercado_core::PaymentMethodId;

use super::{RepositoryError, map_constraint_error};
use crate::models::payment::PaymentMethod;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PaymentMethodRow {
    id: PaymentMethodId,
    name: String,
}

impl From<PaymentMethodRow> for PaymentMethod {
    fn from(row: PaymentMethodRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Repository for payment methods.
pub struct PaymentMethodRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentMethodRepository<'a> {
    /// Create a new payment method repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all payment methods by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<PaymentMethod>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaymentMethodRow>(
            "SELECT id, name FROM shop.payment_method ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a payment method.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    pub async fn create(&self, name: &str) -> Result<PaymentMethod, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentMethodRow>(
            "INSERT INTO shop.payment_method (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            map_constraint_error(e, "payment method already exists", "invalid reference")
        })?;

        Ok(row.into())
    }

    /// Create a payment method unless one with this name exists.
    ///
    /// Returns `true` if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ensure(&self, name: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO shop.payment_method (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
