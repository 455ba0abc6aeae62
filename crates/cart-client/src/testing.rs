//! In-process [`CartApi`] double for unit tests.

use std::sync::{Mutex, PoisonError};

use futures::future::{self, BoxFuture};
use ninja_cats_core::api::ApiStatus;
use ninja_cats_core::{CartSessionId, ProductId};

use crate::api::{CartApi, CartApiError, StatusReply};

/// How the fake answers.
#[derive(Debug, Clone, Default)]
pub enum Reply {
    /// Each endpoint's success status.
    #[default]
    Success,
    /// Every call fails before reaching the server.
    Error,
    /// Every mutation answers with this reply.
    Status(StatusReply),
}

#[derive(Debug, Default)]
pub struct FakeCartApi {
    reply: Reply,
    items: Vec<ProductId>,
    calls: Mutex<Vec<String>>,
}

impl FakeCartApi {
    pub fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            ..Self::default()
        }
    }

    pub fn with_items(items: Vec<ProductId>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Calls received so far, e.g. `add p1 <session>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn mutation(&self, call: String, success: u16) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        self.record(call);
        let result = match &self.reply {
            Reply::Success => Ok(StatusReply {
                status: success,
                body: (success != 204).then(|| ApiStatus::ok(success, "Created")),
            }),
            Reply::Error => Err(CartApiError::Status(502)),
            Reply::Status(reply) => Ok(reply.clone()),
        };
        Box::pin(future::ready(result))
    }
}

impl CartApi for FakeCartApi {
    fn create_cart_session(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        self.mutation(format!("create {id}"), 201)
    }

    fn get_cart_items(
        &self,
        id: CartSessionId,
    ) -> BoxFuture<'_, Result<Vec<ProductId>, CartApiError>> {
        self.record(format!("items {id}"));
        let result = match self.reply {
            Reply::Error => Err(CartApiError::Status(502)),
            _ => Ok(self.items.clone()),
        };
        Box::pin(future::ready(result))
    }

    fn add_cart_item(
        &self,
        product_id: ProductId,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        self.mutation(format!("add {product_id} {cart_session_id}"), 201)
    }

    fn remove_cart_item(
        &self,
        product_id: ProductId,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        self.mutation(format!("remove {product_id} {cart_session_id}"), 204)
    }

    fn create_order(
        &self,
        cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        self.mutation(format!("order {cart_session_id}"), 201)
    }
}

/// A transport whose requests never complete.
#[derive(Debug, Default)]
pub struct StalledCartApi;

impl CartApi for StalledCartApi {
    fn create_cart_session(
        &self,
        _id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        Box::pin(future::pending())
    }

    fn get_cart_items(
        &self,
        _id: CartSessionId,
    ) -> BoxFuture<'_, Result<Vec<ProductId>, CartApiError>> {
        Box::pin(future::pending())
    }

    fn add_cart_item(
        &self,
        _product_id: ProductId,
        _cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        Box::pin(future::pending())
    }

    fn remove_cart_item(
        &self,
        _product_id: ProductId,
        _cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        Box::pin(future::pending())
    }

    fn create_order(
        &self,
        _cart_session_id: CartSessionId,
    ) -> BoxFuture<'_, Result<StatusReply, CartApiError>> {
        Box::pin(future::pending())
    }
}
