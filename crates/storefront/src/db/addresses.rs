//! Shipping address repository.
//!
//! Every query is scoped to the owning user; an address belonging to
//! someone else is reported as not found.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mercado_core::{AddressId, UserId};

use super::{RepositoryError, map_constraint_error};
use crate::models::address::{Address, NewAddress};

/// Column list matching [`AddressRow`].
pub(crate) const ADDRESS_COLUMNS: &str = "id, user_id, street, city, zip_code, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AddressRow {
    id: AddressId,
    user_id: UserId,
    street: String,
    city: String,
    zip_code: String,
    created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            street: row.street,
            city: row.city,
            zip_code: row.zip_code,
            created_at: row.created_at,
        }
    }
}

/// Repository for shipping addresses.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's addresses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM shop.address WHERE user_id = $1 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add an address for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user does not exist.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.address (user_id, street, city, zip_code)
             VALUES ($1, $2, $3, $4)
             RETURNING {ADDRESS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(user_id)
            .bind(input.street.trim())
            .bind(input.city.trim())
            .bind(input.zip_code.trim())
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_constraint_error(e, "address already exists", "unknown user"))?;

        Ok(row.into())
    }

    /// Delete one of the user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no such address.
    /// Returns `RepositoryError::Conflict` if an order still ships to it.
    pub async fn delete(&self, user_id: UserId, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.address WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(e, "address already exists", "address is used by an order")
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
