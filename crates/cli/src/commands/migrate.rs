//! Database migration command.
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded at
//! compile time. The session table used by tower-sessions is created by its
//! store's own migration.
//!
//! Migrations never run automatically when the storefront starts.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, connect};

/// Run shop and session migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
