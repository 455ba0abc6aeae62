//! Catalog listing.
//!
//! Uses the same settings as the storefront (`SANITY_*`,
//! `STOREFRONT_CATALOG_FILE`).

use std::sync::Arc;

use ninja_cats_core::Product;
use ninja_cats_storefront::catalog::{self, Catalog, CatalogError, CatalogQuery};
use ninja_cats_storefront::config::{CatalogConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur while reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Open the catalog configured in the environment.
pub fn open() -> Result<Arc<dyn Catalog>, CatalogCommandError> {
    let config = CatalogConfig::from_env()?;
    Ok(catalog::open(&config)?)
}

/// Print one page of the catalog.
pub async fn list(search: Option<&str>, order: Option<&str>) -> Result<(), CatalogCommandError> {
    let query = CatalogQuery::from_params(search, order);
    tracing::debug!(groq = %query.to_groq(), "Querying catalog");

    let products = open()?.fetch(&query).await?;

    #[allow(clippy::print_stdout)]
    {
        if products.is_empty() {
            println!("No courses found.");
        }
        for product in &products {
            println!("{}", format_row(product));
        }
    }
    Ok(())
}

/// One listing line: ID, price, stock and title.
pub(crate) fn format_row(product: &Product) -> String {
    let stock = if product.is_in_stock() {
        format!("{} left", product.stock_quantity)
    } else {
        "out of stock".to_owned()
    };
    format!(
        "{:<24} {:>9}  {:<12}  {}",
        product.id.to_string(),
        product.price.to_string(),
        stock,
        product.title
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ninja_cats_core::{Price, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn product(stock: i64) -> Product {
        Product {
            id: ProductId::from("c1"),
            title: "Shadow Pouncing".to_owned(),
            description: String::new(),
            price: Price::new(Decimal::new(4999, 2)).unwrap(),
            stock_quantity: stock,
            image: None,
        }
    }

    #[test]
    fn test_row_shows_price_and_stock() {
        let row = format_row(&product(3));
        assert!(row.starts_with("c1 "));
        assert!(row.contains("$49.99"));
        assert!(row.contains("3 left"));
        assert!(row.ends_with("Shadow Pouncing"));
    }

    #[test]
    fn test_row_marks_out_of_stock() {
        assert!(format_row(&product(0)).contains("out of stock"));
    }
}
