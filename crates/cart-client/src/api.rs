//! Transport for the storefront cart endpoints.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use ninja_cats_core::api::{
    ApiStatus, CartItemRequest, CartItemsResponse, CartSessionRequest, OrderRequest,
};
use ninja_cats_core::{CartSessionId, ProductId};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Errors from the cart endpoints that prevent reading a reply at all.
#[derive(Debug, Error)]
pub enum CartApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The server answered a read with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Reply of a mutating cart endpoint.
///
/// `body` is `None` when the server sent no content (e.g. 204 on remove).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub status: u16,
    pub body: Option<ApiStatus>,
}

/// The five cart endpoints.
pub trait CartApi: Send + Sync {
    fn create_cart_session(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>>;

    fn get_cart_items(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<Vec<ProductId>, CartApiError>>;

    fn add_cart_item(
        &self,
        product_id: ProductId,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>>;

    fn remove_cart_item(
        &self,
        product_id: ProductId,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>>;

    fn create_order(
        &self,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>>;
}

/// [`CartApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCartApi {
    /// Create a client for a storefront, e.g. `http://127.0.0.1:3000/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, CartApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url })
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(u16, Vec<u8>), CartApiError> {
        let url = self.base_url.join(path)?;
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        Ok((status, bytes.to_vec()))
    }

    async fn mutate<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<StatusReply, CartApiError> {
        let (status, raw) = self.post(path, body).await?;
        let body = if raw.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&raw)?)
        };
        Ok(StatusReply { status, body })
    }

    #[instrument(skip(self))]
    async fn fetch_items(&self, id: CartSessionId) -> Result<Vec<ProductId>, CartApiError> {
        let (status, raw) = self
            .post("get-cart-items", &CartSessionRequest { id })
            .await?;
        if status != 200 {
            return Err(CartApiError::Status(status));
        }
        let response: CartItemsResponse = serde_json::from_slice(&raw)?;
        Ok(response.cart_items)
    }
}

impl CartApi for HttpCartApi {
    fn create_cart_session(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        async move {
            self.mutate("create-cart-session", &CartSessionRequest { id })
                .await
        }
        .boxed()
    }

    fn get_cart_items(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<Vec<ProductId>, CartApiError>> {
        self.fetch_items(id).boxed()
    }

    fn add_cart_item(
        &self,
        product_id: ProductId,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        async move {
            let body = CartItemRequest {
                product_id,
                cart_session_id,
            };
            self.mutate("add-cart-item", &body).await
        }
        .boxed()
    }

    fn remove_cart_item(
        &self,
        product_id: ProductId,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        async move {
            let body = CartItemRequest {
                product_id,
                cart_session_id,
            };
            self.mutate("remove-cart-item", &body).await
        }
        .boxed()
    }

    fn create_order(
        &self,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        async move {
            self.mutate("create-order", &OrderRequest { cart_session_id })
                .await
        }
        .boxed()
    }
}
