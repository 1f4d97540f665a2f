//! Errors produced by the cart and order workflows.

use thiserror::Error;

use mercado_core::ProductId;

use crate::db::RepositoryError;

/// Why a cart or order operation failed.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// The named entity does not exist or is not visible to the caller.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The caller may not see or change this resource.
    #[error("access denied")]
    Forbidden,

    /// Checkout was attempted without any cart lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Not enough units of a product to satisfy the request.
    #[error(
        "insufficient stock for {product_name}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: i32,
        available: i32,
    },

    /// The operation clashes with the current state (e.g. order already paid).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Input failed validation.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The database rejected a write; nothing was committed.
    #[error("transaction failed: {0}")]
    Transaction(#[source] RepositoryError),
}

impl From<RepositoryError> for CommerceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("record"),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Transaction(other),
        }
    }
}
