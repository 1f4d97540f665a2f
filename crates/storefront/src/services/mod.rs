//! Business logic for the shop.
//!
//! # Services
//!
//! - `cart` - Cart lines, quantities and totals
//! - `checkout` - Turning carts into orders, payments, status changes
//! - `orders` - Order listings, details and sales figures
//!
//! Services are generic over [`Store`](crate::store::Store) and borrow it for
//! their lifetime, the same way repositories borrow the pool.

pub mod cart;
pub mod checkout;
mod error;
pub mod orders;

pub use cart::CartService;
pub use checkout::CheckoutService;
pub use error::CommerceError;
pub use orders::OrderQueryService;
