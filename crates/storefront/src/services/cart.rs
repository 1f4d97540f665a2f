//! Cart management.
//!
//! Every operation acts on the caller's own cart, so a line ID from someone
//! else's cart is simply not found. Stock is checked when lines are added or
//! resized but is only taken out at checkout.

use tracing::instrument;

use mercado_core::{CartLineId, Money, ProductId, UserId};

use super::CommerceError;
use crate::models::cart::{CartView, cart_total};
use crate::models::{Cart, CartLine};
use crate::store::{Store, UnitOfWork};

/// Cart operations over a [`Store`].
pub struct CartService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> CartService<'a, S> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Get the user's cart, creating an empty one on first use.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Transaction` if the database fails.
    pub async fn get_or_create_cart(&self, user_id: UserId) -> Result<Cart, CommerceError> {
        let mut tx = self.store.begin().await?;
        let cart = tx.get_or_create_cart(user_id).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// The user's cart with its lines and total.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Transaction` if the database fails.
    pub async fn view(&self, user_id: UserId) -> Result<CartView, CommerceError> {
        let mut tx = self.store.begin().await?;
        let cart = tx.get_or_create_cart(user_id).await?;
        let lines = tx.cart_lines(cart.id).await?;
        tx.commit().await?;
        Ok(CartView::new(&cart, lines))
    }

    /// Add `quantity` units of a product to the user's cart.
    ///
    /// If the product is already in the cart its quantity grows and the
    /// original snapshot price is kept. Otherwise a new line records the
    /// product's current price.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` if `quantity` is not positive.
    /// Returns `CommerceError::NotFound` if the product does not exist.
    /// Returns `CommerceError::InsufficientStock` if the cart would hold more
    /// units than are in stock. Nothing is written in that case.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, CommerceError> {
        ensure_positive(quantity)?;

        let mut tx = self.store.begin().await?;
        let cart = tx.get_or_create_cart(user_id).await?;
        let product = tx
            .find_product(product_id)
            .await?
            .ok_or(CommerceError::NotFound("product"))?;

        let existing = tx
            .cart_lines(cart.id)
            .await?
            .into_iter()
            .find(|l| l.product_id == product_id);
        let in_cart = existing.as_ref().map_or(0, |l| l.quantity);
        let requested = in_cart
            .checked_add(quantity)
            .ok_or_else(|| CommerceError::Validation("quantity is too large".to_string()))?;

        if requested > product.stock {
            return Err(CommerceError::InsufficientStock {
                product_id,
                product_name: product.name,
                requested,
                available: product.stock,
            });
        }

        let line = match existing {
            Some(line) => tx.set_cart_line_quantity(line.id, requested).await?,
            None => {
                tx.insert_cart_line(cart.id, product_id, quantity, product.price)
                    .await?
            }
        };
        tx.commit().await?;

        tracing::debug!(line_id = %line.id, quantity = line.quantity, "Cart line saved");
        Ok(line)
    }

    /// Overwrite the quantity of one of the user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` if `quantity` is not positive.
    /// Returns `CommerceError::NotFound` if the line is not in the user's cart.
    /// Returns `CommerceError::InsufficientStock` if `quantity` exceeds stock.
    #[instrument(skip(self), fields(user_id = %user_id, line_id = %line_id))]
    pub async fn update_item_quantity(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<CartLine, CommerceError> {
        ensure_positive(quantity)?;

        let mut tx = self.store.begin().await?;
        let cart = tx
            .find_cart(user_id)
            .await?
            .ok_or(CommerceError::NotFound("cart line"))?;
        let line = tx
            .cart_lines(cart.id)
            .await?
            .into_iter()
            .find(|l| l.id == line_id)
            .ok_or(CommerceError::NotFound("cart line"))?;

        let product = tx.find_product(line.product_id).await?;
        let available = product.as_ref().map_or(0, |p| p.stock);
        if quantity > available {
            return Err(CommerceError::InsufficientStock {
                product_id: line.product_id,
                product_name: product_name(product.map(|p| p.name), line.product_id),
                requested: quantity,
                available,
            });
        }

        let line = tx.set_cart_line_quantity(line_id, quantity).await?;
        tx.commit().await?;
        Ok(line)
    }

    /// Remove one line from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the line is not in the user's cart.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<(), CommerceError> {
        let mut tx = self.store.begin().await?;
        let cart = tx
            .find_cart(user_id)
            .await?
            .ok_or(CommerceError::NotFound("cart line"))?;
        if !tx.delete_cart_line(cart.id, line_id).await? {
            return Err(CommerceError::NotFound("cart line"));
        }
        tx.commit().await?;
        Ok(())
    }

    /// Remove every line from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Transaction` if the database fails.
    pub async fn clear_cart(&self, user_id: UserId) -> Result<(), CommerceError> {
        let mut tx = self.store.begin().await?;
        if let Some(cart) = tx.find_cart(user_id).await? {
            let removed = tx.clear_cart(cart.id).await?;
            tracing::debug!(cart_id = %cart.id, removed, "Cart cleared");
        }
        tx.commit().await?;
        Ok(())
    }

    /// Sum of quantity times snapshot price over the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Transaction` if the database fails.
    pub async fn total(&self, user_id: UserId) -> Result<Money, CommerceError> {
        let mut tx = self.store.begin().await?;
        let total = match tx.find_cart(user_id).await? {
            Some(cart) => cart_total(&tx.cart_lines(cart.id).await?),
            None => Money::ZERO,
        };
        tx.commit().await?;
        Ok(total)
    }
}

fn ensure_positive(quantity: i32) -> Result<(), CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::Validation(
            "quantity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Display name for a product that may have been deleted.
pub(super) fn product_name(name: Option<String>, id: ProductId) -> String {
    name.unwrap_or_else(|| format!("product #{id}"))
}
