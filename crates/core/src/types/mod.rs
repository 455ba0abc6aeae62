//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod query;

pub use id::{CartSessionId, CartSessionIdError, ProductId};
pub use order::{OrderSnapshot, OrderSnapshotError};
pub use price::{Price, PriceError};
pub use product::{ImageRef, Product};
pub use query::{SearchTerm, SortOrder, SortOrderError};
