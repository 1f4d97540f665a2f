//! Mercado Core - Shared domain types.
//!
//! This crate provides the types shared by every Mercado component:
//! - `storefront` - HTTP API for catalog, cart, checkout and orders
//! - `cli` - Command-line tools for migrations, seeding and catalog import
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. Database encoding for the types is opt-in through the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, fixed-point money, and order/payment statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
