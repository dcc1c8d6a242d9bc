//! Product listing: fetch the first page of products and turn each one into a
//! card carrying an add-to-cart control.

use serde::Serialize;
use tracing::{info, instrument};

use vanilla_connector_core::ProductVariantId;

use crate::shopify::{Product, ShopifyError, StorefrontClient};

/// Alt text used when a product has no title.
pub const MISSING_TITLE_ALT: &str = "No image available";

/// Display data for one product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    /// Featured image URL, empty when the product has none.
    pub image_src: String,
    pub image_alt: String,
    pub title: String,
    pub description: String,
    /// `"{amount} {currency_code}"` of the product's variant.
    pub price_label: String,
    /// Parameter of the add-to-cart control.
    pub variant_id: ProductVariantId,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let image_alt = if product.title.is_empty() {
            MISSING_TITLE_ALT.to_string()
        } else {
            product.title.clone()
        };

        Self {
            image_src: product
                .featured_image
                .as_ref()
                .map(|image| image.url.clone())
                .unwrap_or_default(),
            image_alt,
            title: product.title.clone(),
            description: product.description.clone(),
            price_label: product.variant.price.to_string(),
            variant_id: product.variant.id.clone(),
        }
    }
}

/// Ordered collection of rendered cards.
///
/// Cards are only ever appended; rendering twice shows every product twice.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductContainer {
    cards: Vec<ProductCard>,
}

impl ProductContainer {
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn append(&mut self, card: ProductCard) {
        self.cards.push(card);
    }

    /// Append one card per product, in the given order.
    pub fn append_products(&mut self, products: &[Product]) {
        self.cards.extend(products.iter().map(ProductCard::from));
    }

    #[must_use]
    pub fn cards(&self) -> &[ProductCard] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Fetch products and append their cards to `container`.
///
/// Returns the number of cards appended. On failure nothing is appended;
/// logging the error is left to the caller.
///
/// # Errors
///
/// Returns the `ShopifyError` from the listing query.
#[instrument(skip_all)]
pub async fn render_products(
    client: &StorefrontClient,
    container: &mut ProductContainer,
) -> Result<usize, ShopifyError> {
    let products = client.get_products().await?;

    container.append_products(&products);
    info!(count = products.len(), "Rendered product cards");
    Ok(products.len())
}
