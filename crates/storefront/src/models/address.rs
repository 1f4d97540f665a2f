//! Shipping addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{AddressId, UserId};

/// A shipping address owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an address.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub zip_code: String,
}

impl NewAddress {
    /// Check that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns the name of the first blank field.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("street", &self.street),
            ("city", &self.city),
            ("zip_code", &self.zip_code),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} cannot be empty"));
            }
        }
        Ok(())
    }
}
