//! JSON bodies of the cart endpoints.
//!
//! Field names follow the wire format exactly (`snake_case` row columns,
//! `camelCase` for the status envelope) so older clients keep working.
//!
//! ```text
//! POST /create-cart-session  { "id": "<uuid>" }
//! POST /get-cart-items       { "id": "<uuid>" }              -> { "cartItems": ["..."] }
//! POST /add-cart-item        { "product_id", "cart_session_id" }
//! POST /remove-cart-item     { "product_id", "cart_session_id" }
//! POST /create-order         { "cart_session_id" }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{CartSessionId, ProductId};

/// Body of `/create-cart-session` and `/get-cart-items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSessionRequest {
    pub id: CartSessionId,
}

/// Body of `/add-cart-item` and `/remove-cart-item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemRequest {
    pub product_id: ProductId,
    pub cart_session_id: CartSessionId,
}

/// Body of `/create-order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub cart_session_id: CartSessionId,
}

/// Response of `/get-cart-items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemsResponse {
    pub cart_items: Vec<ProductId>,
}

/// Status envelope returned by every mutating endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    pub status: u16,
    pub status_text: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiStatus {
    /// Status body for a successful operation.
    #[must_use]
    pub fn ok(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            error: None,
        }
    }

    /// Status body carrying an error message.
    #[must_use]
    pub fn error(status: u16, status_text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            error: Some(error.into()),
        }
    }
}
