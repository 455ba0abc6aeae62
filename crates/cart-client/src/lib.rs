//! Cart session client for the Ninja Training for Cats storefront.
//!
//! Keeps a local cart in step with the storefront's cart endpoints:
//!
//! - [`storage`] - Durable key-value storage for the session ID
//! - [`api`] - The five cart endpoints over HTTP
//! - [`session`] - Session Manager: reuse or register one session per client
//! - [`sync`] - Cart Synchronizer: optimistic local mutations, background requests
//! - [`view`] - Storefront View: product affordances, cart panel, checkout confirmation
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ninja_cats_cart::{CartSynchronizer, FileStore, HttpCartApi, Pending, SessionManager, Storefront};
//!
//! let api = Arc::new(HttpCartApi::new("http://127.0.0.1:3000/".parse()?)?);
//! let sessions = SessionManager::new(api.clone(), Arc::new(FileStore::new("session.json")));
//! let (sync, restore) = CartSynchronizer::start(api, sessions.get_or_create_session());
//! let mut view = Storefront::new(products, sync);
//! view.press_product(&product_id).map(Pending::detach);
//!
//! // Later, when the stored cart has been fetched
//! if let Some(restore) = restore {
//!     view.restore_cart(restore.await.unwrap_or_default());
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod pending;
pub mod session;
pub mod storage;
pub mod sync;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{CartApi, CartApiError, HttpCartApi, StatusReply};
pub use cart::Cart;
pub use pending::Pending;
pub use session::{SessionContext, SessionManager, SessionStart, SessionTask};
pub use storage::{CART_SESSION_KEY, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use sync::{CartSynchronizer, MutationOutcome};
pub use view::{Affordance, CONFIRMATION_WINDOW, CartLine, CartPanel, Storefront};
