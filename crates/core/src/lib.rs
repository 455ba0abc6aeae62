//! Ninja Cats Core - Shared types library.
//!
//! This crate provides common types used across all storefront components:
//! - `storefront` - Server-rendered catalog and cart endpoints
//! - `cart-client` - Session manager and cart synchronizer
//! - `cli` - Command-line tools for migrations and terminal shopping
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, products and catalog query options
//! - [`api`] - JSON bodies exchanged between the cart client and the storefront

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;

pub use types::*;
