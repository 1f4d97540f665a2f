//! Catalog domain models: categories and products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{CategoryId, Money, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Unique display name.
    pub name: String,
}

/// A product offered in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Unique display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Current unit price. Cart and order lines keep their own snapshot.
    pub price: Money,
    /// Units available for sale, never negative.
    pub stock: i32,
    /// Optional image reference.
    pub image_url: Option<String>,
    /// Category the product belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Unique display name.
    pub name: String,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl NewProduct {
    /// Check the input against catalog rules.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message if the name is blank, or the price or
    /// stock is negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name cannot be empty".to_string());
        }
        validate_price_and_stock(Some(self.price), Some(self.stock))
    }
}

/// Partial update for a product.
///
/// Every field is optional; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductPatch {
    /// Returns `true` if the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image_url.is_none()
            && self.category_id.is_none()
    }

    /// Check the fields that are present against catalog rules.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("product name cannot be empty".to_string());
        }
        validate_price_and_stock(self.price, self.stock)
    }
}

fn validate_price_and_stock(price: Option<Money>, stock: Option<i32>) -> Result<(), String> {
    if price.is_some_and(|p| p.is_negative()) {
        return Err("price cannot be negative".to_string());
    }
    if stock.is_some_and(|s| s < 0) {
        return Err("stock cannot be negative".to_string());
    }
    Ok(())
}

/// Filter criteria for listing products.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Only products in this category.
    pub category_id: Option<CategoryId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            stock: Some(0),
            ..ProductPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_rejects_negative_stock() {
        let patch = ProductPatch {
            stock: Some(-1),
            ..ProductPatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_new_product_rejects_blank_name_and_negative_price() {
        let mut input = NewProduct {
            name: "  ".to_string(),
            description: String::new(),
            price: Money::from_cents(100),
            stock: 1,
            image_url: None,
            category_id: None,
        };
        assert!(input.validate().is_err());

        input.name = "Yerba".to_string();
        input.price = Money::from_cents(-100);
        assert!(input.validate().is_err());

        input.price = Money::ZERO;
        assert!(input.validate().is_ok());
    }
}
