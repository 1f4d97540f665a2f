//! Category repository.

use sqlx::PgPool;

use mercado_core::CategoryId;

use super::{RepositoryError, map_constraint_error};
use crate::models::catalog::Category;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

const NAME_TAKEN: &str = "category name already exists";

/// Repository for product categories.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name FROM shop.category ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn get(&self, id: CategoryId) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM shop.category WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Into::into)
            .ok_or(RepositoryError::NotFound)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    pub async fn create(&self, name: &str) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO shop.category (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint_error(e, NAME_TAKEN, NAME_TAKEN))?;

        Ok(row.into())
    }

    /// Create a category unless one with this name exists.
    ///
    /// Returns `true` if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ensure(&self, name: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO shop.category (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn rename(&self, id: CategoryId, name: &str) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, CategoryRow>(
            "UPDATE shop.category SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint_error(e, NAME_TAKEN, NAME_TAKEN))?
        .map(Into::into)
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Its products become uncategorized.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
