//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors and transactions)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fill the span field, tag Sentry, echo the header)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, current_request_id, request_id_middleware};
pub use session::create_session_layer;
