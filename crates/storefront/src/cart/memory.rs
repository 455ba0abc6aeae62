//! In-memory cart store for local development and tests.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use ninja_cats_core::{CartSessionId, ProductId};
use tokio::sync::RwLock;

use super::{CartStore, RepositoryError};

/// An order recorded by [`MemoryCartStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrder {
    pub cart_session_id: CartSessionId,
    pub line_items: Vec<ProductId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    sessions: HashSet<CartSessionId>,
    items: Vec<(CartSessionId, ProductId)>,
    orders: Vec<StoredOrder>,
}

/// Cart store holding every table in process memory.
///
/// Enforces the same constraints as the database schema: unique session
/// IDs, items and orders only for known sessions, one row per
/// (session, product).
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded order, oldest first.
    pub async fn orders(&self) -> Vec<StoredOrder> {
        self.tables.read().await.orders.clone()
    }

    /// Number of known cart sessions.
    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }
}

fn unknown_session(id: CartSessionId) -> RepositoryError {
    RepositoryError::Conflict(format!("unknown cart session {id}"))
}

impl CartStore for MemoryCartStore {
    fn create_session(&self, id: CartSessionId) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move {
            let mut tables = self.tables.write().await;
            if !tables.sessions.insert(id) {
                return Err(RepositoryError::Conflict(format!(
                    "cart session {id} already exists"
                )));
            }
            Ok(())
        }
        .boxed()
    }

    fn session_exists(&self, id: CartSessionId) -> BoxFuture<'_, Result<bool, RepositoryError>> {
        async move { Ok(self.tables.read().await.sessions.contains(&id)) }.boxed()
    }

    fn cart_item_product_ids(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<Vec<ProductId>, RepositoryError>> {
        async move {
            let tables = self.tables.read().await;
            Ok(tables
                .items
                .iter()
                .filter(|(session, _)| *session == id)
                .map(|(_, product)| product.clone())
                .collect())
        }
        .boxed()
    }

    fn add_item<'a>(
        &'a self,
        product_id: &'a ProductId,
        session_id: CartSessionId,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        async move {
            let mut tables = self.tables.write().await;
            if !tables.sessions.contains(&session_id) {
                return Err(unknown_session(session_id));
            }
            let exists = tables
                .items
                .iter()
                .any(|(session, product)| *session == session_id && product == product_id);
            if !exists {
                tables.items.push((session_id, product_id.clone()));
            }
            Ok(())
        }
        .boxed()
    }

    fn remove_item<'a>(
        &'a self,
        product_id: &'a ProductId,
        session_id: CartSessionId,
    ) -> BoxFuture<'a, Result<u64, RepositoryError>> {
        async move {
            let mut tables = self.tables.write().await;
            let before = tables.items.len();
            tables
                .items
                .retain(|(session, product)| !(*session == session_id && product == product_id));
            Ok(u64::try_from(before - tables.items.len()).unwrap_or(u64::MAX))
        }
        .boxed()
    }

    fn create_order<'a>(
        &'a self,
        session_id: CartSessionId,
        line_items: &'a [ProductId],
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        async move {
            let mut tables = self.tables.write().await;
            if !tables.sessions.contains(&session_id) {
                return Err(unknown_session(session_id));
            }
            tables.orders.push(StoredOrder {
                cart_session_id: session_id,
                line_items: line_items.to_vec(),
                created_at: Utc::now(),
            });
            Ok(())
        }
        .boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async { Ok(()) }.boxed()
    }
}
