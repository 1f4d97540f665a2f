//! Seed reference data from a YAML file.
//!
//! ```yaml
//! payment_methods:
//!   - credit card
//!   - cash
//! categories:
//!   - Mate
//!   - Yerba
//! ```
//!
//! Entries that already exist are left alone, so seeding is repeatable.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use mercado_storefront::db::{CategoryRepository, PaymentMethodRepository};

use super::{CliError, connect};

/// Contents of a seed file.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub payment_methods: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl SeedFile {
    /// Parse a seed file, dropping blank names.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Yaml` if the content is not a valid seed file.
    pub fn parse(content: &str) -> Result<Self, CliError> {
        let mut seed: Self = serde_yaml::from_str(content)?;
        for names in [&mut seed.payment_methods, &mut seed.categories] {
            names.retain(|n| !n.trim().is_empty());
        }
        Ok(seed)
    }
}

/// Insert the payment methods and categories listed in `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a database
/// operation fails.
pub async fn run(file: &Path) -> Result<(), CliError> {
    info!(path = %file.display(), "Loading seed file");
    let content = tokio::fs::read_to_string(file).await?;
    let seed = SeedFile::parse(&content)?;

    let pool = connect().await?;

    let methods = PaymentMethodRepository::new(&pool);
    let mut created = 0;
    for name in &seed.payment_methods {
        if methods.ensure(name.trim()).await? {
            created += 1;
        }
    }
    info!(
        created,
        skipped = seed.payment_methods.len() - created,
        "Payment methods seeded"
    );

    let categories = CategoryRepository::new(&pool);
    let mut created = 0;
    for name in &seed.categories {
        if categories.ensure(name.trim()).await? {
            created += 1;
        }
    }
    info!(
        created,
        skipped = seed.categories.len() - created,
        "Categories seeded"
    );

    Ok(())
}
