//! Identity extractors.
//!
//! The caller's identity is established upstream. An authentication layer
//! either inserts a [`CurrentUser`] into the request extensions or stores
//! it in the session under [`keys::CURRENT_USER`]. These extractors only
//! read it.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::models::session::keys;

/// Extractor that requires an authenticated caller.
///
/// Rejects with `401 Unauthorized` if no identity is present.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(RequireAuth(user): RequireAuth) -> String {
///     format!("orders for user {}", user.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            set_sentry_user(&user.id);
            return Ok(Self(*user));
        }

        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(unauthorized());
        };

        let user = session
            .get::<CurrentUser>(keys::CURRENT_USER)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to read session");
                unauthorized()
            })?
            .ok_or_else(unauthorized)?;

        set_sentry_user(&user.id);
        Ok(Self(user))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Rejects with `401 Unauthorized` if no identity is present and
/// `403 Forbidden` if the caller is not an admin.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden("admin access required".to_string()));
        }
        Ok(Self(user))
    }
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("authentication required".to_string())
}
