//! Cart persistence.
//!
//! # Tables
//!
//! - `cart_sessions` - One row per anonymous browser session
//! - `cart_items` - (session, product) membership rows; no quantities
//! - `orders` - One marker row per checkout
//! - `order_items` - Product IDs copied at checkout (only with the
//!   `line_items` order snapshot policy)
//!
//! Sessions are never expired or collected.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p ninja-cats-cli -- migrate
//! ```

mod memory;
mod postgres;

pub use memory::{MemoryCartStore, StoredOrder};
pub use postgres::{PgCartStore, create_pool};

use futures::future::BoxFuture;
use ninja_cats_core::{CartSessionId, ProductId};
use thiserror::Error;

/// Error type for cart store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (duplicate session, unknown session, ...).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Store for cart sessions, cart items and orders.
///
/// Every operation is scoped by a cart session ID. Implementations must
/// reject items and orders that reference an unknown session.
pub trait CartStore: Send + Sync {
    /// Insert a new cart session.
    fn create_session(&self, id: CartSessionId) -> BoxFuture<'_, Result<(), RepositoryError>>;

    /// Whether a cart session exists.
    fn session_exists(&self, id: CartSessionId) -> BoxFuture<'_, Result<bool, RepositoryError>>;

    /// Product IDs currently in a session's cart.
    fn cart_item_product_ids(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<Vec<ProductId>, RepositoryError>>;

    /// Put a product in a session's cart. Adding a product twice is a no-op.
    fn add_item<'a>(
        &'a self,
        product_id: &'a ProductId,
        session_id: CartSessionId,
    ) -> BoxFuture<'a, Result<(), RepositoryError>>;

    /// Remove every row for a product from a session's cart, returning the
    /// number of rows removed.
    fn remove_item<'a>(
        &'a self,
        product_id: &'a ProductId,
        session_id: CartSessionId,
    ) -> BoxFuture<'a, Result<u64, RepositoryError>>;

    /// Record an order for a session, optionally with the product IDs that
    /// were in the cart.
    fn create_order<'a>(
        &'a self,
        session_id: CartSessionId,
        line_items: &'a [ProductId],
    ) -> BoxFuture<'a, Result<(), RepositoryError>>;

    /// Check that the store is reachable.
    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>>;
}
