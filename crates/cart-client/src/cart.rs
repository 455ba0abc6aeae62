//! Local cart state.

use ninja_cats_core::ProductId;

/// Product IDs in the order they were added.
///
/// A cache of the server-side cart: duplicates are kept locally even though
/// the server stores set membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<ProductId>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, product_id: ProductId) {
        self.items.push(product_id);
    }

    /// Remove every occurrence of a product, returning how many were removed.
    pub fn remove_all(&mut self, product_id: &ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|id| id != product_id);
        before - self.items.len()
    }

    /// Take the server's items, keeping local additions it does not know
    /// about yet after them.
    pub fn merge_restored(&mut self, restored: Vec<ProductId>) {
        let local = std::mem::replace(&mut self.items, restored);
        for id in local {
            if !self.items.contains(&id) {
                self.items.push(id);
            }
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains(product_id)
    }

    #[must_use]
    pub fn items(&self) -> &[ProductId] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
