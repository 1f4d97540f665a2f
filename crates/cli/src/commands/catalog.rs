//! Catalog import and export as JSON Lines.
//!
//! One product per line:
//!
//! ```json
//! {"name":"Yerba 1kg","description":"","price":"10.00","stock":5,"image_url":null,"category_id":2}
//! ```
//!
//! Import skips blank lines and products whose name already exists.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use mercado_core::{CategoryId, Money};
use mercado_storefront::db::ProductRepository;
use mercado_storefront::models::{NewProduct, Product, ProductFilter};

use super::{CliError, connect};

/// One line of a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl From<Product> for CatalogEntry {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
            category_id: product.category_id,
        }
    }
}

impl From<CatalogEntry> for NewProduct {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            name: entry.name,
            description: entry.description,
            price: entry.price,
            stock: entry.stock,
            image_url: entry.image_url,
            category_id: entry.category_id,
        }
    }
}

/// Parse every non-blank line of a catalog file into a valid product.
///
/// # Errors
///
/// Returns `CliError::InvalidLine` naming the first line (1-based) that is
/// not valid JSON or fails catalog validation.
pub fn parse_catalog(content: &str) -> Result<Vec<NewProduct>, CliError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let invalid = |message: String| CliError::InvalidLine {
                line: index + 1,
                message,
            };
            let entry: CatalogEntry =
                serde_json::from_str(line).map_err(|e| invalid(e.to_string()))?;
            let product = NewProduct::from(entry);
            product.validate().map_err(invalid)?;
            Ok(product)
        })
        .collect()
}

/// Create the products listed in `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, any line is invalid, or a
/// database operation fails. Nothing is written if a line is invalid.
pub async fn import(file: &Path) -> Result<(), CliError> {
    info!(path = %file.display(), "Importing catalog");
    let content = tokio::fs::read_to_string(file).await?;
    let products = parse_catalog(&content)?;

    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);

    let mut created = 0;
    let mut skipped = 0;
    for product in &products {
        if repo.get_by_name(product.name.trim()).await?.is_some() {
            tracing::debug!(name = %product.name, "Product exists, skipping");
            skipped += 1;
            continue;
        }
        repo.create(product).await?;
        created += 1;
    }

    info!(created, skipped, "Catalog import complete");
    Ok(())
}

/// Write every product to `file`, replacing its contents.
///
/// # Errors
///
/// Returns an error if the database query or the file write fails.
pub async fn export(file: &Path) -> Result<(), CliError> {
    let pool = connect().await?;
    let products = ProductRepository::new(&pool)
        .list(&ProductFilter::default())
        .await?;

    let count = products.len();
    let output = render_catalog(products)?;
    tokio::fs::write(file, output).await?;

    info!(path = %file.display(), count, "Catalog export complete");
    Ok(())
}

fn render_catalog(products: Vec<Product>) -> Result<String, CliError> {
    let mut output = String::new();
    for product in products {
        let line = serde_json::to_string(&CatalogEntry::from(product))?;
        output.push_str(&line);
        output.push('\n');
    }
    Ok(output)
}
