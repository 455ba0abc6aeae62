//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{Catalog, ImageUrlBuilder};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`; the catalog and cart store
/// are trait objects so tests can swap in the in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn Catalog>,
    cart_store: Arc<dyn CartStore>,
    images: ImageUrlBuilder,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product catalog source
    /// * `cart_store` - Cart persistence backend
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<dyn Catalog>,
        cart_store: Arc<dyn CartStore>,
    ) -> Self {
        let images = ImageUrlBuilder::new(&config.catalog.project_id, &config.catalog.dataset);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart_store,
                images,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn Catalog {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart_store(&self) -> &dyn CartStore {
        self.inner.cart_store.as_ref()
    }

    /// Get a reference to the product image URL builder.
    #[must_use]
    pub fn images(&self) -> &ImageUrlBuilder {
        &self.inner.images
    }
}
