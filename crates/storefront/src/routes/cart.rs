//! Cart endpoints.
//!
//! Each endpoint is a JSON `POST`; every other method is answered with 405
//! and an `ApiStatus` body by [`method_not_allowed`]. Bodies that fail to
//! deserialize are rejected with 400 before touching the store.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use ninja_cats_core::OrderSnapshot;
use ninja_cats_core::api::{
    ApiStatus, CartItemRequest, CartItemsResponse, CartSessionRequest, OrderRequest,
};
use tracing::instrument;

use crate::error::{AppError, Result, canonical_reason};
use crate::state::AppState;

/// Unwrap a JSON body, turning extractor rejections into 400s.
fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn created() -> (StatusCode, Json<ApiStatus>) {
    let status = StatusCode::CREATED;
    (
        status,
        Json(ApiStatus::ok(status.as_u16(), canonical_reason(status))),
    )
}

/// Fallback for any non-POST request to a cart endpoint.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Register a new cart session.
#[instrument(skip(state, payload))]
pub async fn create_cart_session(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CartSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiStatus>)> {
    let request = body(payload)?;
    state.cart_store().create_session(request.id).await?;
    tracing::info!(cart_session_id = %request.id, "Cart session created");
    Ok(created())
}

/// List the product IDs in a session's cart.
///
/// Always answers 200: an unknown session, or a failed lookup, yields an
/// empty list so the client can start from a clean cart.
#[instrument(skip(state, payload))]
pub async fn get_cart_items(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CartSessionRequest>, JsonRejection>,
) -> Result<Json<CartItemsResponse>> {
    let request = body(payload)?;
    let store = state.cart_store();

    let cart_items = match store.session_exists(request.id).await {
        Ok(true) => store
            .cart_item_product_ids(request.id)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(cart_session_id = %request.id, "Failed to load cart items: {e}");
                Vec::new()
            }),
        Ok(false) => {
            tracing::debug!(cart_session_id = %request.id, "Unknown cart session");
            Vec::new()
        }
        Err(e) => {
            tracing::error!(cart_session_id = %request.id, "Failed to look up cart session: {e}");
            Vec::new()
        }
    };

    Ok(Json(CartItemsResponse { cart_items }))
}

/// Put a product in a session's cart.
#[instrument(skip(state, payload))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CartItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiStatus>)> {
    let request = body(payload)?;
    state
        .cart_store()
        .add_item(&request.product_id, request.cart_session_id)
        .await?;
    tracing::debug!(
        cart_session_id = %request.cart_session_id,
        product_id = %request.product_id,
        "Cart item added"
    );
    Ok(created())
}

/// Remove every row for a product from a session's cart.
///
/// Answers 204 with no body, whether or not anything was removed.
#[instrument(skip(state, payload))]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CartItemRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let request = body(payload)?;
    let removed = state
        .cart_store()
        .remove_item(&request.product_id, request.cart_session_id)
        .await?;
    tracing::debug!(
        cart_session_id = %request.cart_session_id,
        product_id = %request.product_id,
        removed,
        "Cart item removed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Record an order for a session.
///
/// The cart itself is left untouched. With the `line_items` snapshot policy
/// the session's current product IDs are copied onto the order.
#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiStatus>)> {
    let request = body(payload)?;
    let store = state.cart_store();

    let line_items = match state.config().order_snapshot {
        OrderSnapshot::MarkerOnly => Vec::new(),
        OrderSnapshot::LineItems => store.cart_item_product_ids(request.cart_session_id).await?,
    };

    store
        .create_order(request.cart_session_id, &line_items)
        .await?;
    tracing::info!(
        cart_session_id = %request.cart_session_id,
        line_items = line_items.len(),
        "Order created"
    );
    Ok(created())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use http_body_util::BodyExt;
    use ninja_cats_core::{CartSessionId, ProductId};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::cart::{CartStore, MemoryCartStore};
    use crate::routes::test_support::test_state;

    async fn send(
        store: &MemoryCartStore,
        snapshot: OrderSnapshot,
        method: Method,
        uri: &str,
        body: Value,
    ) -> (StatusCode, Option<Value>) {
        let app = crate::app(test_state(store.clone(), snapshot));
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = (!bytes.is_empty()).then(|| serde_json::from_slice(&bytes).unwrap());
        (status, json)
    }

    #[tokio::test]
    async fn test_every_cart_endpoint_rejects_get() {
        let store = MemoryCartStore::new();
        for path in [
            "/create-cart-session",
            "/get-cart-items",
            "/add-cart-item",
            "/remove-cart-item",
            "/create-order",
        ] {
            let (status, body) = send(
                &store,
                OrderSnapshot::MarkerOnly,
                Method::GET,
                path,
                json!({}),
            )
            .await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{path}");
            assert_eq!(
                body.unwrap(),
                json!({
                    "status": 405,
                    "statusText": "Method Not Allowed",
                    "error": "This endpoint requires a POST request."
                })
            );
        }
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_put_and_delete_are_also_rejected() {
        let store = MemoryCartStore::new();
        for method in [Method::PUT, Method::DELETE, Method::PATCH] {
            let (status, _) = send(
                &store,
                OrderSnapshot::MarkerOnly,
                method,
                "/add-cart-item",
                json!({}),
            )
            .await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        }
    }

    #[tokio::test]
    async fn test_session_item_and_order_flow() {
        let store = MemoryCartStore::new();
        let id = CartSessionId::generate().to_string();
        let snapshot = OrderSnapshot::MarkerOnly;

        let (status, body) = send(
            &store,
            snapshot,
            Method::POST,
            "/create-cart-session",
            json!({ "id": id }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.unwrap()["statusText"], "Created");

        let item = json!({ "product_id": "p1", "cart_session_id": id });
        let (status, _) = send(&store, snapshot, Method::POST, "/add-cart-item", item.clone()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &store,
            snapshot,
            Method::POST,
            "/get-cart-items",
            json!({ "id": id }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap(), json!({ "cartItems": ["p1"] }));

        let (status, body) = send(&store, snapshot, Method::POST, "/remove-cart-item", item).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_none());

        let (status, _) = send(
            &store,
            snapshot,
            Method::POST,
            "/create-order",
            json!({ "cart_session_id": id }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let orders = store.orders().await;
        assert_eq!(orders.len(), 1);
        assert!(orders[0].line_items.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_yields_empty_items() {
        let store = MemoryCartStore::new();
        let (status, body) = send(
            &store,
            OrderSnapshot::MarkerOnly,
            Method::POST,
            "/get-cart-items",
            json!({ "id": CartSessionId::generate().to_string() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap(), json!({ "cartItems": [] }));
    }

    #[tokio::test]
    async fn test_item_for_unknown_session_is_conflict() {
        let store = MemoryCartStore::new();
        let (status, body) = send(
            &store,
            OrderSnapshot::MarkerOnly,
            Method::POST,
            "/add-cart-item",
            json!({ "product_id": "p1", "cart_session_id": CartSessionId::generate().to_string() }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        let body = body.unwrap();
        assert_eq!(body["status"], 409);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let store = MemoryCartStore::new();
        let (status, body) = send(
            &store,
            OrderSnapshot::MarkerOnly,
            Method::POST,
            "/create-cart-session",
            json!({ "id": "not-a-uuid" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap()["statusText"], "Bad Request");
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_line_item_snapshot_copies_cart() {
        let store = MemoryCartStore::new();
        let id = CartSessionId::generate();
        store.create_session(id).await.unwrap();
        store.add_item(&ProductId::from("p1"), id).await.unwrap();
        store.add_item(&ProductId::from("p2"), id).await.unwrap();

        let (status, _) = send(
            &store,
            OrderSnapshot::LineItems,
            Method::POST,
            "/create-order",
            json!({ "cart_session_id": id.to_string() }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let orders = store.orders().await;
        assert_eq!(
            orders[0].line_items,
            vec![ProductId::from("p1"), ProductId::from("p2")]
        );
        // Checkout leaves the cart alone
        assert_eq!(store.cart_item_product_ids(id).await.unwrap().len(), 2);
    }
}
