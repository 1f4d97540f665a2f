//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error is rendered as a JSON body:
//!
//! ```json
//! { "error": "insufficient_stock", "message": "...", "product_id": 2, "available": 0 }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::middleware::current_request_id;
use crate::services::CommerceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart or order workflow failed.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Commerce(err) => match err {
                CommerceError::NotFound(_) => StatusCode::NOT_FOUND,
                CommerceError::Forbidden => StatusCode::FORBIDDEN,
                CommerceError::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
                CommerceError::InsufficientStock { .. } | CommerceError::Conflict(_) => {
                    StatusCode::CONFLICT
                }
                CommerceError::Validation(_) => StatusCode::BAD_REQUEST,
                CommerceError::Transaction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable error kind for the `error` field.
    fn kind(&self) -> &'static str {
        match self {
            Self::Commerce(err) => match err {
                CommerceError::NotFound(_) => "not_found",
                CommerceError::Forbidden => "forbidden",
                CommerceError::EmptyCart => "empty_cart",
                CommerceError::InsufficientStock { .. } => "insufficient_stock",
                CommerceError::Conflict(_) => "conflict",
                CommerceError::Validation(_) => "validation",
                CommerceError::Transaction(_) => "internal",
            },
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => "not_found",
            Self::Database(RepositoryError::Conflict(_)) => "conflict",
            Self::Database(_) | Self::Internal(_) => "internal",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::BadRequest(_) => "validation",
        }
    }

    /// Message shown to the client.
    fn message(&self) -> String {
        match self {
            Self::Commerce(err) => match err {
                CommerceError::Conflict(msg) | CommerceError::Validation(msg) => msg.clone(),
                CommerceError::Transaction(_) => "Internal server error".to_string(),
                other => other.to_string(),
            },
            Self::Database(RepositoryError::NotFound) => "record not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let mut body = Map::new();
        body.insert("error".to_string(), json!(self.kind()));
        body.insert("message".to_string(), json!(self.message()));

        if let Self::Commerce(CommerceError::InsufficientStock {
            product_id,
            product_name,
            requested,
            available,
        }) = &self
        {
            body.insert("product_id".to_string(), json!(product_id));
            body.insert("product_name".to_string(), json!(product_name));
            body.insert("requested".to_string(), json!(requested));
            body.insert("available".to_string(), json!(available));
        }

        // Capture server errors to Sentry; the client only gets a correlation id
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            let correlation_id =
                current_request_id().unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                correlation_id = %correlation_id,
                "Request error"
            );
            body.insert("correlation_id".to_string(), json!(correlation_id));
        } else if status != StatusCode::NOT_FOUND {
            tracing::info!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Called by the identity extractors so errors are associated with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Order placed", Some(&[("order_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
