//! Catalog product as authored in the content service.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Opaque reference to an image asset hosted by the content service.
///
/// Only the asset reference string is kept; turning it into a URL is the
/// content service's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    asset: AssetRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AssetRef {
    #[serde(rename = "_ref")]
    reference: String,
}

impl ImageRef {
    /// Create an image reference from an asset reference string.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            asset: AssetRef {
                reference: reference.into(),
            },
        }
    }

    /// The raw asset reference, e.g. `image-abc123-600x400-png`.
    #[must_use]
    pub fn asset_ref(&self) -> &str {
        &self.asset.reference
    }
}

/// A product ("course") document.
///
/// Read-only from the storefront's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub stock_quantity: i64,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

impl Product {
    /// Whether the product can currently be put in a cart.
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_cms_document() {
        let json = r#"{
            "_id": "c1",
            "_type": "course",
            "title": "Shadow Pouncing",
            "description": "Silent approach from the sofa",
            "price": 49.99,
            "stockQuantity": 3,
            "image": {"_type": "image", "asset": {"_type": "reference", "_ref": "image-abc-300x300-png"}}
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id.as_str(), "c1");
        assert_eq!(product.stock_quantity, 3);
        assert_eq!(product.price.to_string(), "$49.99");
        assert_eq!(
            product.image.as_ref().map(ImageRef::asset_ref),
            Some("image-abc-300x300-png")
        );
    }

    #[test]
    fn test_stock_boundary() {
        let mut product: Product = serde_json::from_str(
            r#"{"_id":"c2","title":"t","description":"d","price":1,"stockQuantity":0}"#,
        )
        .unwrap();
        assert!(!product.is_in_stock());

        product.stock_quantity = 1;
        assert!(product.is_in_stock());

        product.stock_quantity = -2;
        assert!(!product.is_in_stock());
    }
}
