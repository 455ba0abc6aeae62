//! Integration test harness for Ninja Training for Cats.
//!
//! Each test binds its own storefront on an ephemeral port, backed by an
//! in-memory cart store and a fixed catalog, and talks to it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! # Everything except the database tests
//! cargo test -p ninja-cats-integration-tests
//!
//! # Including PostgreSQL (requires STOREFRONT_DATABASE_URL)
//! cargo test -p ninja-cats-integration-tests -- --include-ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use ninja_cats_core::{OrderSnapshot, Price, Product, ProductId};
use ninja_cats_storefront::cart::MemoryCartStore;
use ninja_cats_storefront::catalog::StaticCatalog;
use ninja_cats_storefront::config::{CartStoreConfig, CatalogConfig, StorefrontConfig};
use ninja_cats_storefront::state::AppState;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use url::Url;

/// A storefront serving on `127.0.0.1` for the lifetime of a test.
pub struct TestServer {
    pub base_url: Url,
    pub store: MemoryCartStore,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront with the [`courses`] catalog.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(order_snapshot: OrderSnapshot) -> Self {
        let store = MemoryCartStore::new();
        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            cart_store: CartStoreConfig::Memory,
            order_snapshot,
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static")),
            catalog: CatalogConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(
            config,
            Arc::new(StaticCatalog::new(courses())),
            Arc::new(store.clone()),
        );

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let app = ninja_cats_storefront::app(state);
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/")).expect("server URL");
        Self {
            base_url,
            store,
            handle,
        }
    }

    /// Absolute URL for a path on this server.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid relative URL.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path).expect("valid path")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn course(id: &str, title: &str, cents: i64, stock: i64) -> Product {
    Product {
        id: ProductId::from(id),
        title: title.to_owned(),
        description: format!("{title} for the discerning cat."),
        price: Price::new(Decimal::new(cents, 2)).unwrap_or(Price::ZERO),
        stock_quantity: stock,
        image: None,
    }
}

/// The catalog every test server serves, in source order.
#[must_use]
pub fn courses() -> Vec<Product> {
    vec![
        course("course-stealth", "Stealth Stalking", 4999, 5),
        course("course-pounce", "Advanced Pouncing", 2999, 1),
        course("course-nap", "Strategic Napping", 999, 0),
    ]
}
