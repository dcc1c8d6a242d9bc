//! Product listing command.
//!
//! # Usage
//!
//! ```bash
//! vc-cli products
//! ```

use vanilla_connector_storefront::catalog::{self, ProductCard, ProductContainer};
use vanilla_connector_storefront::config::StorefrontConfig;
use vanilla_connector_storefront::shopify::StorefrontClient;

use super::CommandError;

/// Fetch the first page of products and print one card per product.
///
/// # Errors
///
/// Returns an error if the listing query fails.
pub async fn list(config: &StorefrontConfig) -> Result<(), CommandError> {
    let client = StorefrontClient::new(&config.shopify, config.limits);
    let mut container = ProductContainer::new();

    catalog::render_products(&client, &mut container).await?;

    if container.is_empty() {
        print_line("No products found");
    }
    for card in container.cards() {
        print_line(&format_card(card));
    }

    Ok(())
}

fn format_card(card: &ProductCard) -> String {
    let image = if card.image_src.is_empty() {
        format!("[{}]", card.image_alt)
    } else {
        card.image_src.clone()
    };

    format!(
        "{}\n  {}\n  Price: {}\n  Image: {}\n  Variant: {}\n",
        card.title, card.description, card.price_label, image, card.variant_id
    )
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
