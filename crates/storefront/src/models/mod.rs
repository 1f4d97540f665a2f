//! Domain models for the storefront.
//!
//! Row types used by the database layer live next to their queries; the
//! types here are what services and handlers pass around.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod payment;
pub mod session;
pub mod user;

pub use address::{Address, NewAddress};
pub use cart::{Cart, CartLine, CartView};
pub use catalog::{Category, NewCategory, NewProduct, Product, ProductFilter, ProductPatch};
pub use order::{
    DailySales, NewOrder, Order, OrderLine, OrderLineView, OrderView, StatusChange,
};
pub use payment::{NewPayment, NewPaymentMethod, Payment, PaymentMethod};
pub use session::CurrentUser;
pub use user::User;
