//! Cart commands against a running storefront.
//!
//! The session ID is kept in a local JSON file under the same key a browser
//! would use, so repeated runs share one cart.

use std::path::PathBuf;
use std::sync::Arc;

use ninja_cats_cart::{
    Affordance, CartApi, CartApiError, CartSynchronizer, FileStore, HttpCartApi,
    MutationOutcome, SessionManager, SessionTask, Storefront,
};
use ninja_cats_core::ProductId;
use ninja_cats_storefront::catalog::CatalogQuery;
use thiserror::Error;
use url::Url;

use super::catalog::{self, CatalogCommandError};

/// Errors that can occur while changing the cart.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("Cart API error: {0}")]
    Api(#[from] CartApiError),

    #[error(transparent)]
    Catalog(#[from] CatalogCommandError),

    #[error("Unknown course: {0}")]
    UnknownProduct(ProductId),

    #[error("Course is out of stock: {0}")]
    OutOfStock(ProductId),

    #[error("{operation} was not confirmed: {detail}")]
    NotConfirmed {
        operation: &'static str,
        detail: String,
    },

    #[error("{0} was interrupted")]
    Interrupted(&'static str),
}

/// Resume (or start) the session in `session_file` and load the catalog.
pub async fn open(base_url: Url, session_file: PathBuf) -> Result<Storefront, CartCommandError> {
    let api: Arc<dyn CartApi> = Arc::new(HttpCartApi::new(base_url)?);
    let sessions = SessionManager::new(Arc::clone(&api), Arc::new(FileStore::new(session_file)));
    let start = sessions.get_or_create_session();
    let context = start.context;

    let products = catalog::open()?
        .fetch(&CatalogQuery::default())
        .await
        .map_err(CatalogCommandError::from)?;
    let mut view = Storefront::new(products, CartSynchronizer::new(api, context));

    // The command's request must not reach the server before the session row
    match start.task {
        SessionTask::Restore(pending) => view.restore_cart(pending.await.unwrap_or_default()),
        SessionTask::Register(pending) => {
            confirmed("create-cart-session", pending.await)?;
        }
        SessionTask::AlreadyStarted => {}
    }
    Ok(view)
}

pub fn show(view: &Storefront) {
    let session = view.synchronizer().session().cart_session_id;

    #[allow(clippy::print_stdout)]
    {
        println!("Cart session {session}");
        match view.cart_panel() {
            None => println!("Cart is empty."),
            Some(panel) => {
                for line in &panel.lines {
                    println!("  {}  {}  ({})", line.price, line.title, line.product_id);
                }
                let hidden = view.cart().len().saturating_sub(panel.lines.len());
                if hidden > 0 {
                    println!("  ...and {hidden} item(s) no longer in the catalog");
                }
            }
        }
    }
}

pub async fn add(view: &mut Storefront, product_id: ProductId) -> Result<(), CartCommandError> {
    let affordance = view
        .catalog()
        .iter()
        .find(|product| product.id == product_id)
        .map(|product| view.affordance(product))
        .ok_or_else(|| CartCommandError::UnknownProduct(product_id.clone()))?;

    match affordance {
        Affordance::OutOfStock => Err(CartCommandError::OutOfStock(product_id)),
        Affordance::ViewCart => {
            tracing::info!(%product_id, "Already in cart");
            Ok(())
        }
        Affordance::AddToCart => match view.press_product(&product_id) {
            Some(request) => confirmed("add-cart-item", request.await),
            None => Ok(()),
        },
    }
}

pub async fn remove(view: &mut Storefront, product_id: ProductId) -> Result<(), CartCommandError> {
    if !view.cart().contains(&product_id) {
        tracing::info!(%product_id, "Not in cart");
    }
    confirmed("remove-cart-item", view.remove(&product_id).await)
}

pub async fn checkout(view: &mut Storefront) -> Result<(), CartCommandError> {
    confirmed("create-order", view.checkout().await)?;

    #[allow(clippy::print_stdout)]
    {
        println!("Thanks! Your order has been placed.");
    }
    Ok(())
}

fn confirmed(
    operation: &'static str,
    outcome: Option<MutationOutcome>,
) -> Result<(), CartCommandError> {
    match outcome {
        Some(MutationOutcome::Confirmed { .. }) => Ok(()),
        Some(MutationOutcome::Unexpected { status, error, .. }) => {
            Err(CartCommandError::NotConfirmed {
                operation,
                detail: match error {
                    Some(error) => format!("{status} {error}"),
                    None => status.to_string(),
                },
            })
        }
        Some(MutationOutcome::Failed { reason }) => Err(CartCommandError::NotConfirmed {
            operation,
            detail: reason,
        }),
        None => Err(CartCommandError::Interrupted(operation)),
    }
}
