//! Storefront View: what the shopper sees and can press.
//!
//! Holds the loaded catalog page, the cart synchronizer and two UI flags:
//! whether the cart panel is open and whether the checkout confirmation is
//! showing. The confirmation hides itself after [`CONFIRMATION_WINDOW`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ninja_cats_core::{Price, Product, ProductId};
use tokio::task::JoinHandle;

use crate::cart::Cart;
use crate::pending::Pending;
use crate::sync::{CartSynchronizer, MutationOutcome};

/// How long the checkout confirmation stays visible.
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(5);

/// What pressing a product card does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Nothing to do; shown as "Out of stock".
    OutOfStock,
    /// Already in the cart; opens the cart panel.
    ViewCart,
    /// Adds the product to the cart.
    AddToCart,
}

/// One cart entry resolved against the catalog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
}

/// Contents of the cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPanel {
    pub lines: Vec<CartLine>,
    pub visible: bool,
}

/// Client-side storefront state.
#[derive(Debug)]
pub struct Storefront {
    catalog: Vec<Product>,
    sync: CartSynchronizer,
    cart_visible: bool,
    confirmation: Arc<AtomicBool>,
    confirmation_timer: Option<JoinHandle<()>>,
}

impl Storefront {
    #[must_use]
    pub fn new(catalog: Vec<Product>, sync: CartSynchronizer) -> Self {
        Self {
            catalog,
            sync,
            cart_visible: false,
            confirmation: Arc::new(AtomicBool::new(false)),
            confirmation_timer: None,
        }
    }

    /// Swap in a new catalog page (e.g. after changing search or order).
    pub fn set_catalog(&mut self, catalog: Vec<Product>) {
        self.catalog = catalog;
    }

    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.sync.cart()
    }

    #[must_use]
    pub const fn synchronizer(&self) -> &CartSynchronizer {
        &self.sync
    }

    #[must_use]
    pub const fn is_cart_visible(&self) -> bool {
        self.cart_visible
    }

    #[must_use]
    pub fn is_confirmation_showing(&self) -> bool {
        self.confirmation.load(Ordering::SeqCst)
    }

    /// What pressing this product's card does.
    #[must_use]
    pub fn affordance(&self, product: &Product) -> Affordance {
        if !product.is_in_stock() {
            Affordance::OutOfStock
        } else if self.cart().contains(&product.id) {
            Affordance::ViewCart
        } else {
            Affordance::AddToCart
        }
    }

    /// Press a product card: add it, open the cart, or do nothing.
    ///
    /// Returns the add request when one was sent.
    pub fn press_product(&mut self, product_id: &ProductId) -> Option<Pending<MutationOutcome>> {
        let affordance = self
            .catalog
            .iter()
            .find(|product| &product.id == product_id)
            .map(|product| self.affordance(product))?;

        match affordance {
            Affordance::AddToCart => self.sync.add_item(&self.catalog, product_id),
            Affordance::ViewCart => {
                self.cart_visible = true;
                None
            }
            Affordance::OutOfStock => None,
        }
    }

    /// Apply cart items restored from the server after the view was built.
    pub fn restore_cart(&mut self, items: Vec<ProductId>) {
        self.sync.restore(items);
    }

    pub fn toggle_cart(&mut self) {
        self.cart_visible = !self.cart_visible;
    }

    /// Remove a product from the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> Pending<MutationOutcome> {
        self.sync.remove_item(product_id)
    }

    /// Place the order and show the confirmation for five seconds.
    ///
    /// The confirmation shows immediately, whatever the server answers.
    /// Checking out again restarts the window.
    pub fn checkout(&mut self) -> Pending<MutationOutcome> {
        let request = self.sync.checkout();

        if let Some(timer) = self.confirmation_timer.take() {
            timer.abort();
        }
        self.confirmation.store(true, Ordering::SeqCst);

        let confirmation = Arc::clone(&self.confirmation);
        self.confirmation_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(CONFIRMATION_WINDOW).await;
            confirmation.store(false, Ordering::SeqCst);
        }));

        request
    }

    /// Hide the confirmation before its window ends.
    pub fn dismiss_confirmation(&mut self) {
        if let Some(timer) = self.confirmation_timer.take() {
            timer.abort();
        }
        self.confirmation.store(false, Ordering::SeqCst);
    }

    /// The cart panel, or `None` when the cart is empty.
    ///
    /// Cart entries not on the current catalog page are skipped.
    #[must_use]
    pub fn cart_panel(&self) -> Option<CartPanel> {
        if self.cart().is_empty() {
            return None;
        }

        let lines = self
            .cart()
            .items()
            .iter()
            .filter_map(|id| self.catalog.iter().find(|product| &product.id == id))
            .map(|product| CartLine {
                product_id: product.id.clone(),
                title: product.title.clone(),
                price: product.price,
            })
            .collect();

        Some(CartPanel {
            lines,
            visible: self.cart_visible,
        })
    }
}

impl Drop for Storefront {
    fn drop(&mut self) {
        if let Some(timer) = self.confirmation_timer.take() {
            timer.abort();
        }
    }
}
