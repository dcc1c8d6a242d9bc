//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! response shapes in [`super::queries`].

use serde::{Deserialize, Serialize};

use vanilla_connector_core::{
    CartId, CartLineId, ImageId, Money, ProductId, ProductVariantId,
};

// =============================================================================
// Product Types
// =============================================================================

/// Product featured image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Shopify image ID.
    pub id: Option<ImageId>,
    /// Image URL.
    pub url: String,
}

/// The purchasable variant shown for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID (the merchandise ID for cart lines).
    pub id: ProductVariantId,
    /// Variant title (e.g., "Default Title", "Large / Red").
    pub title: Option<String>,
    /// Variant price.
    pub price: Money,
}

/// A product with its first variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product title (empty when the API omitted it).
    pub title: String,
    /// Plain-text description.
    pub description: String,
    /// Featured image.
    pub featured_image: Option<Image>,
    /// First variant.
    pub variant: ProductVariant,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Merchandise referenced by a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: ProductVariantId,
    /// Variant title.
    pub title: Option<String>,
}

/// A line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line ID.
    pub id: CartLineId,
    /// Merchandise on this line.
    pub merchandise: CartMerchandise,
    /// Quantity.
    pub quantity: i64,
}

/// A cart snapshot as returned by a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Cart lines, in API order.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Sum of quantities over the returned lines.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Variant ID to add.
    pub merchandise_id: ProductVariantId,
    /// Quantity to add.
    pub quantity: i64,
}

impl CartLineInput {
    /// A single unit of one variant, the only line shape add-to-cart sends.
    #[must_use]
    pub const fn single(merchandise_id: ProductVariantId) -> Self {
        Self {
            merchandise_id,
            quantity: 1,
        }
    }
}

/// User error returned by a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUserError {
    /// Field path that caused the error.
    pub field: Option<Vec<String>>,
    /// Error message.
    pub message: String,
}
