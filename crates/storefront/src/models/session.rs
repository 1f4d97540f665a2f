//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use mercado_core::UserId;

/// The authenticated caller of a request.
///
/// Written to the session (or request extensions) by the authentication
/// layer; every workflow entry point receives its `id` from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Whether the user has admin privileges.
    pub is_admin: bool,
}

impl CurrentUser {
    /// Returns `true` if the caller owns a resource belonging to `owner`
    /// or is an admin.
    #[must_use]
    pub fn can_access(&self, owner: UserId) -> bool {
        self.is_admin || self.id == owner
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
