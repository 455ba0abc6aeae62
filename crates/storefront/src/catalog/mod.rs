//! Product catalog backed by the headless CMS.
//!
//! # Architecture
//!
//! - The CMS is the source of truth for products - NO local copy
//! - Queries are built by [`CatalogQuery`] and sent as GROQ with bound parameters
//! - In-memory caching via `moka` for query responses (5 minute TTL)
//! - A JSON fixture file can stand in for the CMS during development
//!
//! # Example
//!
//! ```rust,ignore
//! use ninja_cats_storefront::catalog::{Catalog, CatalogQuery, SanityCatalog};
//!
//! let catalog = SanityCatalog::new(&config.catalog)?;
//! let query = CatalogQuery::from_params(Some("stealth"), Some("price asc"));
//! let products = catalog.fetch(&query).await?;
//! ```

mod fixture;
pub mod image;
pub mod query;
mod sanity;

pub use fixture::StaticCatalog;
pub use image::{ImageTransform, ImageUrlBuilder};
pub use query::CatalogQuery;
pub use sanity::SanityCatalog;

use std::sync::Arc;

use futures::future::BoxFuture;
use ninja_cats_core::Product;
use thiserror::Error;

use crate::config::CatalogConfig;

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The content API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured project or dataset does not form a valid URL.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The fixture file could not be read.
    #[error("fixture error: {0}")]
    Fixture(#[from] std::io::Error),
}

/// Open the configured catalog: the fixture file when one is set, otherwise
/// the content API.
///
/// # Errors
///
/// Returns an error if the fixture cannot be loaded or the content API
/// endpoint is invalid.
pub fn open(config: &CatalogConfig) -> Result<Arc<dyn Catalog>, CatalogError> {
    match &config.fixture_path {
        Some(path) => Ok(Arc::new(StaticCatalog::from_path(path)?)),
        None => {
            let catalog = SanityCatalog::new(config)?;
            tracing::info!(?catalog, "Content API client created");
            Ok(Arc::new(catalog))
        }
    }
}

/// A source of catalog pages.
pub trait Catalog: Send + Sync {
    /// Fetch the products matching a query, in the query's order.
    fn fetch<'a>(
        &'a self,
        query: &'a CatalogQuery,
    ) -> BoxFuture<'a, Result<Vec<Product>, CatalogError>>;
}
