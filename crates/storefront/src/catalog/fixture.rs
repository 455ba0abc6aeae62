//! In-memory catalog for development and tests.

use std::path::Path;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use ninja_cats_core::Product;

use super::sanity::decode_products;
use super::{Catalog, CatalogError, CatalogQuery};

/// A fixed product list queried locally with [`CatalogQuery::apply`].
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Arc<Vec<Product>>,
}

impl StaticCatalog {
    /// Create a catalog from products in source order.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// Load a catalog from a JSON file holding an array of CMS documents.
    ///
    /// Documents that fail validation are skipped with a warning, the same
    /// way live query results are.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let documents: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        let products = decode_products(documents);
        tracing::info!(path = %path.display(), count = products.len(), "Loaded catalog fixture");
        Ok(Self::new(products))
    }

    /// All products, unfiltered.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Catalog for StaticCatalog {
    fn fetch<'a>(
        &'a self,
        query: &'a CatalogQuery,
    ) -> BoxFuture<'a, Result<Vec<Product>, CatalogError>> {
        let page = query.apply(self.products.as_ref().clone());
        Box::pin(future::ready(Ok(page)))
    }
}
