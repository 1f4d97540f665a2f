//! Mercado CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (shop schema and session table)
//! mercado-cli migrate
//!
//! # Seed payment methods and categories
//! mercado-cli seed crates/cli/seed.example.yaml
//!
//! # Import or export the product catalog as JSON Lines
//! mercado-cli catalog import products.jsonl
//! mercado-cli catalog export products.jsonl
//!
//! # Manage accounts
//! mercado-cli admin create -u ana -e ana@example.com --admin
//! mercado-cli admin grant ana@example.com
//! mercado-cli admin revoke ana@example.com
//! mercado-cli admin email 42 ana.lopez@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `MERCADO_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mercado_core::UserId;

mod commands;

#[derive(Parser)]
#[command(name = "mercado-cli")]
#[command(author, version, about = "Mercado CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert payment methods and categories from a YAML file
    Seed {
        /// Path to the seed file
        file: PathBuf,
    },
    /// Import or export products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage user accounts and admin rights
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Create products from a JSON Lines file, skipping names that exist
    Import {
        /// Path to the `.jsonl` file
        file: PathBuf,
    },
    /// Write every product to a JSON Lines file
    Export {
        /// Path to the `.jsonl` file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Give the account admin rights
        #[arg(long)]
        admin: bool,
    },
    /// Give an existing account admin rights
    Grant {
        /// Account email address
        email: String,
    },
    /// Take admin rights away from an account
    Revoke {
        /// Account email address
        email: String,
    },
    /// Change the email address of an account
    Email {
        /// Account ID
        id: i32,

        /// New email address
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Import { file } => commands::catalog::import(&file).await?,
            CatalogAction::Export { file } => commands::catalog::export(&file).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                email,
                admin,
            } => {
                commands::admin::create_user(&username, &email, admin).await?;
            }
            AdminAction::Grant { email } => commands::admin::set_admin(&email, true).await?,
            AdminAction::Revoke { email } => commands::admin::set_admin(&email, false).await?,
            AdminAction::Email { id, email } => {
                commands::admin::change_email(UserId::new(id), &email).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_email_takes_id_and_address() {
        let cli = Cli::try_parse_from(["mercado-cli", "admin", "email", "42", "ana@example.com"])
            .expect("valid arguments");
        assert!(matches!(
            cli.command,
            Commands::Admin {
                action: AdminAction::Email { id: 42, ref email },
            } if email == "ana@example.com"
        ));

        assert!(Cli::try_parse_from(["mercado-cli", "admin", "email", "ana", "x@y.z"]).is_err());
    }
}
