//! Product repository.
//!
//! Plain catalog CRUD. Stock changes made by checkout go through the unit of
//! work in [`crate::store`], which shares [`ProductRow`] with this module.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mercado_core::{CategoryId, Money, ProductId};

use super::{RepositoryError, map_constraint_error};
use crate::models::catalog::{NewProduct, Product, ProductFilter, ProductPatch};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Column list matching [`ProductRow`].
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, image_url, category_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Decimal,
    stock: i32,
    image_url: Option<String>,
    category_id: Option<CategoryId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: Money::new(row.price),
            stock: row.stock,
            image_url: row.image_url,
            category_id: row.category_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const NAME_TAKEN: &str = "product name already exists";
const UNKNOWN_CATEGORY: &str = "category does not exist";

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products by name, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product
             WHERE ($1::INT4 IS NULL OR category_id = $1)
             ORDER BY name"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(filter.category_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1");
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Into::into)
            .ok_or(RepositoryError::NotFound)
    }

    /// Get a product by its unique name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE name = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(name)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken or the
    /// category does not exist.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.product (name, description, price, stock, image_url, category_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price.amount())
            .bind(input.stock)
            .bind(&input.image_url)
            .bind(input.category_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_constraint_error(e, NAME_TAKEN, UNKNOWN_CATEGORY))?;

        Ok(row.into())
    }

    /// Apply a partial update. Fields left as `None` keep their value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken or the
    /// category does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE shop.product SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 stock = COALESCE($5, stock),
                 image_url = COALESCE($6, image_url),
                 category_id = COALESCE($7, category_id),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(patch.price.map(|p| p.amount()))
            .bind(patch.stock)
            .bind(&patch.image_url)
            .bind(patch.category_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| map_constraint_error(e, NAME_TAKEN, UNKNOWN_CATEGORY))?
            .map(Into::into)
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// Order lines keep their snapshot with the product reference cleared.
    /// Cart lines keep pointing at the missing product until the owner
    /// removes them; checkout refuses them as out of stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
