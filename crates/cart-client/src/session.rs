//! Session Manager: one cart session per client.
//!
//! The first call to [`SessionManager::get_or_create_session`] decides the
//! session: a stored ID is reused and its cart fetched, otherwise a fresh ID
//! is persisted and registered with the server. Later calls return the same
//! context and do no I/O.

use std::sync::{Arc, Mutex, PoisonError};

use ninja_cats_core::{CartSessionId, ProductId};

use crate::api::CartApi;
use crate::pending::Pending;
use crate::storage::{CART_SESSION_KEY, KeyValueStore};
use crate::sync::MutationOutcome;

/// The session this client's cart is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub cart_session_id: CartSessionId,
}

impl SessionContext {
    #[must_use]
    pub const fn new(cart_session_id: CartSessionId) -> Self {
        Self { cart_session_id }
    }
}

/// Background work started by the first session call.
#[derive(Debug)]
pub enum SessionTask {
    /// The session was decided by an earlier call.
    AlreadyStarted,
    /// A stored session is being restored; yields its cart items (empty on
    /// failure).
    Restore(Pending<Vec<ProductId>>),
    /// A new session is being registered.
    Register(Pending<MutationOutcome>),
}

/// Result of [`SessionManager::get_or_create_session`].
#[derive(Debug)]
pub struct SessionStart {
    pub context: SessionContext,
    pub task: SessionTask,
}

/// Decides and remembers the cart session.
pub struct SessionManager {
    api: Arc<dyn CartApi>,
    storage: Arc<dyn KeyValueStore>,
    started: Mutex<Option<SessionContext>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            storage,
            started: Mutex::new(None),
        }
    }

    /// Return the cart session, starting it on the first call.
    ///
    /// Must be called inside a tokio runtime: the restore or registration
    /// request runs as a spawned task.
    pub fn get_or_create_session(&self) -> SessionStart {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(context) = *started {
            return SessionStart {
                context,
                task: SessionTask::AlreadyStarted,
            };
        }

        let start = match self.stored_session_id() {
            Some(id) => self.restore(id),
            None => self.register(),
        };
        *started = Some(start.context);
        start
    }

    fn stored_session_id(&self) -> Option<CartSessionId> {
        let raw = match self.storage.get(CART_SESSION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read stored cart session: {e}");
                return None;
            }
        };
        match raw.parse() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Ignoring stored cart session: {e}");
                None
            }
        }
    }

    fn restore(&self, id: CartSessionId) -> SessionStart {
        tracing::info!(cart_session_id = %id, "Restoring cart session");
        let api = Arc::clone(&self.api);
        let pending = Pending::spawn(async move {
            api.get_cart_items(id).await.unwrap_or_else(|e| {
                tracing::error!(cart_session_id = %id, "Failed to restore cart items: {e}");
                Vec::new()
            })
        });

        SessionStart {
            context: SessionContext::new(id),
            task: SessionTask::Restore(pending),
        }
    }

    fn register(&self) -> SessionStart {
        let id = CartSessionId::generate();
        tracing::info!(cart_session_id = %id, "Creating cart session");

        // Persisted before the server confirms; a failed registration keeps
        // the ID and the next restore simply finds an empty cart.
        if let Err(e) = self.storage.set(CART_SESSION_KEY, &id.to_string()) {
            tracing::warn!("Failed to persist cart session: {e}");
        }

        let api = Arc::clone(&self.api);
        let pending = Pending::spawn(async move {
            let reply = api.create_cart_session(id).await;
            MutationOutcome::classify("create-cart-session", 201, reply)
        });

        SessionStart {
            context: SessionContext::new(id),
            task: SessionTask::Register(pending),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::{FakeCartApi, Reply};

    fn manager(api: &Arc<FakeCartApi>, storage: &Arc<MemoryStore>) -> SessionManager {
        SessionManager::new(
            Arc::clone(api) as Arc<dyn CartApi>,
            Arc::clone(storage) as Arc<dyn KeyValueStore>,
        )
    }

    #[tokio::test]
    async fn test_fresh_client_registers_and_persists() {
        let api = Arc::new(FakeCartApi::default());
        let storage = Arc::new(MemoryStore::new());
        let start = manager(&api, &storage).get_or_create_session();

        let stored = storage.get(CART_SESSION_KEY).unwrap().unwrap();
        assert_eq!(stored, start.context.cart_session_id.to_string());

        let SessionTask::Register(pending) = start.task else {
            panic!("expected registration");
        };
        assert_eq!(
            pending.await,
            Some(MutationOutcome::Confirmed { status: 201 })
        );
        assert_eq!(api.calls(), vec![format!("create {stored}")]);
    }

    #[tokio::test]
    async fn test_stored_session_is_restored() {
        let id = CartSessionId::generate();
        let api = Arc::new(FakeCartApi::with_items(vec!["p1".into(), "p2".into()]));
        let storage = Arc::new(MemoryStore::with_value(CART_SESSION_KEY, &id.to_string()));

        let start = manager(&api, &storage).get_or_create_session();
        assert_eq!(start.context.cart_session_id, id);

        let SessionTask::Restore(pending) = start.task else {
            panic!("expected restore");
        };
        assert_eq!(pending.await.unwrap(), vec![ProductId::from("p1"), ProductId::from("p2")]);
        assert_eq!(api.calls(), vec![format!("items {id}")]);
    }

    #[tokio::test]
    async fn test_second_call_does_no_io() {
        let api = Arc::new(FakeCartApi::default());
        let storage = Arc::new(MemoryStore::new());
        let manager = manager(&api, &storage);

        let first = manager.get_or_create_session();
        let second = manager.get_or_create_session();

        assert_eq!(first.context, second.context);
        assert!(matches!(second.task, SessionTask::AlreadyStarted));
        if let SessionTask::Register(pending) = first.task {
            let _ = pending.await;
        }
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_registration_keeps_id() {
        let api = Arc::new(FakeCartApi::with_reply(Reply::Error));
        let storage = Arc::new(MemoryStore::new());
        let start = manager(&api, &storage).get_or_create_session();

        let SessionTask::Register(pending) = start.task else {
            panic!("expected registration");
        };
        assert!(matches!(
            pending.await,
            Some(MutationOutcome::Failed { .. })
        ));
        assert_eq!(
            storage.get(CART_SESSION_KEY).unwrap().unwrap(),
            start.context.cart_session_id.to_string()
        );
    }

    #[tokio::test]
    async fn test_failed_restore_yields_empty_cart() {
        let id = CartSessionId::generate();
        let api = Arc::new(FakeCartApi::with_reply(Reply::Error));
        let storage = Arc::new(MemoryStore::with_value(CART_SESSION_KEY, &id.to_string()));

        let SessionTask::Restore(pending) = manager(&api, &storage).get_or_create_session().task
        else {
            panic!("expected restore");
        };
        assert_eq!(pending.await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_unparseable_stored_id_starts_fresh() {
        let api = Arc::new(FakeCartApi::default());
        let storage = Arc::new(MemoryStore::with_value(CART_SESSION_KEY, "not-a-uuid"));

        let start = manager(&api, &storage).get_or_create_session();
        assert!(matches!(start.task, SessionTask::Register(_)));
        assert_eq!(
            storage.get(CART_SESSION_KEY).unwrap().unwrap(),
            start.context.cart_session_id.to_string()
        );
    }
}
