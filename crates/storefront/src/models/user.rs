//! User domain types.
//!
//! Accounts are created by the registration layer or the CLI; this crate only
//! reads them and resolves the caller's identity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mercado_core::UserId;

/// A shop customer account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Whether the user may use admin endpoints.
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
