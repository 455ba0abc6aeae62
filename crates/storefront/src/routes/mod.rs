//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /?order=&search=        - Catalog page
//!
//! # Cart (JSON, POST only; other methods answer 405)
//! POST /create-cart-session    - Register a cart session
//! POST /get-cart-items         - Product IDs in a session's cart
//! POST /add-cart-item          - Add a product to a cart
//! POST /remove-cart-item       - Remove a product from a cart (204)
//! POST /create-order           - Record an order for a session
//! ```

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart endpoint router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-cart-session",
            post(cart::create_cart_session).fallback(cart::method_not_allowed),
        )
        .route(
            "/get-cart-items",
            post(cart::get_cart_items).fallback(cart::method_not_allowed),
        )
        .route(
            "/add-cart-item",
            post(cart::add_cart_item).fallback(cart::method_not_allowed),
        )
        .route(
            "/remove-cart-item",
            post(cart::remove_cart_item).fallback(cart::method_not_allowed),
        )
        .route(
            "/create-order",
            post(cart::create_order).fallback(cart::method_not_allowed),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog page
        .route("/", get(home::index))
        // Cart endpoints
        .merge(cart_routes())
}
