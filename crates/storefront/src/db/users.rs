//! Customer account repository.
//!
//! Registration and login live outside this service. The storefront only
//! reads accounts; the CLI creates them, toggles the admin flag and fixes
//! email addresses.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mercado_core::UserId;

use super::{RepositoryError, map_constraint_error};
use crate::models::user::User;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    email: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            is_admin: row.is_admin,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer accounts.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        is_admin: bool,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO shop.customer (username, email, is_admin)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, is_admin, created_at
            ",
        )
        .bind(username)
        .bind(email)
        .bind(is_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            map_constraint_error(e, "username or email already exists", "invalid reference")
        })?;

        Ok(row.into())
    }

    /// Grant or revoke admin privileges by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account has this email.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_admin(&self, email: &str, is_admin: bool) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE shop.customer
            SET is_admin = $2
            WHERE lower(email) = lower($1)
            RETURNING id, username, email, is_admin, created_at
            ",
        )
        .bind(email)
        .bind(is_admin)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Change the email address of an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account has this ID.
    /// Returns `RepositoryError::Conflict` if another account uses the email.
    pub async fn set_email(&self, id: UserId, email: &str) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE shop.customer
            SET email = $2
            WHERE id = $1
            RETURNING id, username, email, is_admin, created_at
            ",
        )
        .bind(id)
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "email already in use", "invalid reference"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
