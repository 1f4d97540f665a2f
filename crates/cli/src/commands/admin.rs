//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (optionally with admin rights)
//! mercado-cli admin create -u ana -e ana@example.com --admin
//!
//! # Grant or revoke admin rights
//! mercado-cli admin grant ana@example.com
//! mercado-cli admin revoke ana@example.com
//!
//! # Fix an account's email address
//! mercado-cli admin email 42 ana.lopez@example.com
//! ```

use mercado_core::UserId;
use mercado_storefront::db::UserRepository;

use super::{CliError, connect};

/// Basic email shape check.
fn validate_email(email: &str) -> Result<&str, CliError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(CliError::InvalidEmail(email.to_owned())),
    }
}

/// Create a new account.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns an error if the email is malformed, the username or email is
/// taken, or the database is unreachable.
pub async fn create_user(username: &str, email: &str, is_admin: bool) -> Result<UserId, CliError> {
    let email = validate_email(email)?;
    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .create(username.trim(), email, is_admin)
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}, Admin: {}",
        user.id,
        user.username,
        user.is_admin
    );
    Ok(user.id)
}

/// Grant (`true`) or revoke (`false`) admin rights.
///
/// # Errors
///
/// Returns an error if no account has this email or the database is
/// unreachable.
pub async fn set_admin(email: &str, is_admin: bool) -> Result<(), CliError> {
    let email = validate_email(email)?;
    let pool = connect().await?;

    let user = UserRepository::new(&pool).set_admin(email, is_admin).await?;

    if is_admin {
        tracing::info!("Admin rights granted to {} (ID {})", user.email, user.id);
    } else {
        tracing::info!("Admin rights revoked from {} (ID {})", user.email, user.id);
    }
    Ok(())
}

/// Change the email address of the account with this ID.
///
/// # Errors
///
/// Returns an error if the email is malformed or already used by another
/// account, no account has this ID, or the database is unreachable.
pub async fn change_email(id: UserId, email: &str) -> Result<(), CliError> {
    let email = validate_email(email)?;
    let pool = connect().await?;

    let user = UserRepository::new(&pool).set_email(id, email).await?;

    tracing::info!("Email of {} (ID {}) is now {}", user.username, user.id, user.email);
    Ok(())
}
