//! Cart Synchronizer: local cart state mirrored to the server.
//!
//! Every mutation updates the local [`Cart`] immediately and sends the
//! matching request in a background task. Failures are logged, never
//! retried and never rolled back; the server is authoritative and the next
//! restore reconciles.

use std::sync::Arc;

use ninja_cats_core::{CartSessionId, Product, ProductId};

use crate::api::{CartApi, CartApiError, StatusReply};
use crate::cart::Cart;
use crate::pending::Pending;
use crate::session::{SessionContext, SessionStart, SessionTask};

/// What happened to a background cart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server answered with the expected status.
    Confirmed { status: u16 },
    /// The server answered, but not with the expected status.
    Unexpected {
        status: u16,
        status_text: Option<String>,
        error: Option<String>,
    },
    /// No usable answer (network or decoding failure).
    Failed { reason: String },
}

impl MutationOutcome {
    /// Classify a reply against the status the endpoint should return, and
    /// log anything other than a confirmation.
    pub(crate) fn classify(
        operation: &'static str,
        expected: u16,
        reply: Result<StatusReply, CartApiError>,
    ) -> Self {
        match reply {
            Ok(reply) if reply.status == expected => Self::Confirmed {
                status: reply.status,
            },
            Ok(reply) => {
                let (status_text, error) = reply
                    .body
                    .map(|body| (Some(body.status_text), body.error))
                    .unwrap_or_default();
                tracing::warn!(
                    operation,
                    status = reply.status,
                    status_text = status_text.as_deref().unwrap_or_default(),
                    error = error.as_deref().unwrap_or_default(),
                    "Cart request not confirmed"
                );
                Self::Unexpected {
                    status: reply.status,
                    status_text,
                    error,
                }
            }
            Err(e) => {
                tracing::error!(operation, "Cart request failed: {e}");
                Self::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Local cart plus the session it is mirrored to.
pub struct CartSynchronizer {
    api: Arc<dyn CartApi>,
    context: SessionContext,
    cart: Cart,
}

impl std::fmt::Debug for CartSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSynchronizer")
            .field("context", &self.context)
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartSynchronizer {
    /// Create a synchronizer with an empty local cart.
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>, context: SessionContext) -> Self {
        Self {
            api,
            context,
            cart: Cart::new(),
        }
    }

    /// Create a synchronizer from a session start without waiting on the
    /// network.
    ///
    /// A registration finishes in the background. A restore is handed back
    /// so the caller can apply its items with [`CartSynchronizer::restore`]
    /// once they arrive; the cart is usable in the meantime.
    pub fn start(
        api: Arc<dyn CartApi>,
        start: SessionStart,
    ) -> (Self, Option<Pending<Vec<ProductId>>>) {
        let sync = Self::new(api, start.context);
        let restore = match start.task {
            SessionTask::Restore(pending) => Some(pending),
            SessionTask::Register(pending) => {
                pending.detach();
                None
            }
            SessionTask::AlreadyStarted => None,
        };
        (sync, restore)
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    fn session_id(&self) -> CartSessionId {
        self.context.cart_session_id
    }

    /// Add a product from the loaded catalog page.
    ///
    /// Returns `None` without touching the cart when the product is not in
    /// `catalog`. Adding a product already in the cart appends it again.
    pub fn add_item(
        &mut self,
        catalog: &[Product],
        product_id: &ProductId,
    ) -> Option<Pending<MutationOutcome>> {
        if !catalog.iter().any(|product| &product.id == product_id) {
            tracing::debug!(%product_id, "Ignoring add for product outside the catalog page");
            return None;
        }

        self.cart.push(product_id.clone());

        let api = Arc::clone(&self.api);
        let product_id = product_id.clone();
        let session_id = self.session_id();
        Some(Pending::spawn(async move {
            let reply = api.add_cart_item(product_id, session_id).await;
            MutationOutcome::classify("add-cart-item", 201, reply)
        }))
    }

    /// Remove every occurrence of a product.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Pending<MutationOutcome> {
        self.cart.remove_all(product_id);

        let api = Arc::clone(&self.api);
        let product_id = product_id.clone();
        let session_id = self.session_id();
        Pending::spawn(async move {
            let reply = api.remove_cart_item(product_id, session_id).await;
            MutationOutcome::classify("remove-cart-item", 204, reply)
        })
    }

    /// Record an order for the session. The local cart is kept as is.
    pub fn checkout(&self) -> Pending<MutationOutcome> {
        let api = Arc::clone(&self.api);
        let session_id = self.session_id();
        Pending::spawn(async move {
            let reply = api.create_order(session_id).await;
            MutationOutcome::classify("create-order", 201, reply)
        })
    }

    /// Apply the server's view of the cart.
    ///
    /// Products added locally while the restore was in flight are kept.
    pub fn restore(&mut self, items: Vec<ProductId>) {
        tracing::debug!(count = items.len(), "Restored cart items");
        self.cart.merge_restored(items);
    }
}
