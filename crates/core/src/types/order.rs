//! Order policy.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned for an unknown order snapshot policy.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown order snapshot policy {0:?} (expected \"marker\" or \"line_items\")")]
pub struct OrderSnapshotError(String);

/// What an order row records about the cart it was placed from.
///
/// Orders have historically been bare marker rows keyed by the cart session.
/// Copying the cart into the order is opt-in until the product owner decides
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSnapshot {
    /// Only the cart session ID is stored.
    #[default]
    MarkerOnly,
    /// The product IDs in the cart at checkout are stored as order items.
    LineItems,
}

impl FromStr for OrderSnapshot {
    type Err = OrderSnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marker" | "marker_only" => Ok(Self::MarkerOnly),
            "line_items" => Ok(Self::LineItems),
            _ => Err(OrderSnapshotError(s.to_owned())),
        }
    }
}
