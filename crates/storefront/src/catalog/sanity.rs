//! Sanity content API client.
//!
//! Uses the HTTP query endpoint with `reqwest`; GROQ parameters are sent as
//! JSON-encoded `$name` query-string pairs.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use moka::future::Cache;
use ninja_cats_core::Product;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{Catalog, CatalogError, CatalogQuery};
use crate::config::CatalogConfig;

/// Raw query response envelope.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Vec<serde_json::Value>,
}

/// Client for the Sanity query API.
///
/// Query results are cached for 5 minutes, keyed by the full request URL.
#[derive(Clone)]
pub struct SanityCatalog {
    inner: Arc<SanityCatalogInner>,
}

struct SanityCatalogInner {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<SecretString>,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl std::fmt::Debug for SanityCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityCatalog")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl SanityCatalog {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Endpoint` if the project ID, dataset or API
    /// version do not form a valid URL.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(SanityCatalogInner {
                client: reqwest::Client::new(),
                endpoint: query_endpoint(config)?,
                token: config.api_token.clone(),
                cache,
            }),
        })
    }

    /// Build the request URL for a query.
    fn request_url(&self, query: &CatalogQuery) -> Result<Url, CatalogError> {
        let mut url = self.inner.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &query.to_groq());
            for (name, value) in query.params() {
                pairs.append_pair(&format!("${name}"), &serde_json::to_string(&value)?);
            }
        }
        Ok(url)
    }

    #[instrument(skip(self, query), fields(groq = %query.to_groq()))]
    async fn run_query(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        let url = self.request_url(query)?;
        let cache_key = url.to_string();

        if let Some(products) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for catalog query");
            return Ok(products.as_ref().clone());
        }

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Content API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let envelope: QueryResponse = serde_json::from_str(&body)?;
        let products = decode_products(envelope.result);

        self.inner
            .cache
            .insert(cache_key, Arc::new(products.clone()))
            .await;

        Ok(products)
    }
}

impl Catalog for SanityCatalog {
    fn fetch<'a>(
        &'a self,
        query: &'a CatalogQuery,
    ) -> BoxFuture<'a, Result<Vec<Product>, CatalogError>> {
        self.run_query(query).boxed()
    }
}

/// Build `https://<project>.api[cdn].sanity.io/v<version>/data/query/<dataset>`.
fn query_endpoint(config: &CatalogConfig) -> Result<Url, url::ParseError> {
    let host = if config.use_cdn { "apicdn" } else { "api" };
    Url::parse(&format!(
        "https://{}.{host}.sanity.io/v{}/data/query/{}",
        config.project_id, config.api_version, config.dataset
    ))
}

/// Decode CMS documents, dropping the ones that break catalog invariants
/// (negative price or stock, missing fields).
pub(super) fn decode_products(documents: Vec<serde_json::Value>) -> Vec<Product> {
    documents
        .into_iter()
        .filter_map(|document| match serde_json::from_value::<Product>(document) {
            Ok(product) if product.stock_quantity < 0 => {
                warn!(product_id = %product.id, "Dropping product with negative stock");
                None
            }
            Ok(product) => Some(product),
            Err(e) => {
                warn!(error = %e, "Dropping malformed catalog document");
                None
            }
        })
        .collect()
}
