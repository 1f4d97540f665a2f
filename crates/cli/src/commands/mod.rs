//! Command implementations.

pub mod admin;
pub mod catalog;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use mercado_storefront::db::{self, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not valid YAML.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A catalog entry could not be written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A catalog line could not be parsed.
    #[error("Line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
}

/// Connect to the shop database named by the environment.
async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MERCADO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("MERCADO_DATABASE_URL"))?;

    tracing::info!("Connecting to shop database...");
    Ok(db::create_pool(&database_url, 2).await?)
}
