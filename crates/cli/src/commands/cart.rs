//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Add one unit of a variant, creating the cart on first use
//! vc-cli add gid://shopify/ProductVariant/123
//!
//! # Show the stored cart ID
//! vc-cli cart
//! ```

use vanilla_connector_core::ProductVariantId;
use vanilla_connector_storefront::cart::{
    CartIdStore, CartSession, CartUpdate, FileCartIdStore,
};
use vanilla_connector_storefront::config::StorefrontConfig;
use vanilla_connector_storefront::shopify::StorefrontClient;

use super::CommandError;

/// Add one unit of `variant_id` to the stored cart.
///
/// # Errors
///
/// Returns an error if the ID is empty, the store is unreadable, or the
/// cart mutation fails.
pub async fn add(config: &StorefrontConfig, variant_id: &str) -> Result<(), CommandError> {
    let variant_id = variant_id.trim();
    if variant_id.is_empty() {
        return Err(CommandError::InvalidArgument(
            "variant ID must not be empty".to_string(),
        ));
    }

    let client = StorefrontClient::new(&config.shopify, config.limits);
    let store = FileCartIdStore::new(&config.cart_store_path);
    let session = CartSession::open(client, store).await?;

    let update = session
        .add_to_cart(&ProductVariantId::new(variant_id))
        .await?;

    print_line(&describe_update(&update));
    Ok(())
}

/// Print the stored cart ID, if any.
///
/// # Errors
///
/// Returns an error if the store exists but cannot be read.
pub async fn show(config: &StorefrontConfig) -> Result<(), CommandError> {
    let store = FileCartIdStore::new(&config.cart_store_path);

    match store.load().await? {
        Some(cart_id) => print_line(&format!("Cart: {cart_id}")),
        None => print_line("No cart yet"),
    }
    Ok(())
}

fn describe_update(update: &CartUpdate) -> String {
    let cart = update.cart();
    let action = match update {
        CartUpdate::Created(_) => "Created cart",
        CartUpdate::LinesAdded(_) => "Added to cart",
    };
    format!("{action} {} ({} items)", cart.id, cart.total_quantity())
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}

#[cfg(test)]
mod tests {
    use vanilla_connector_core::{CartId, CartLineId};
    use vanilla_connector_storefront::shopify::{Cart, CartLine, CartMerchandise};

    use super::*;

    fn cart(quantity: i64) -> Cart {
        Cart {
            id: CartId::new("gid://cart/1"),
            lines: vec![CartLine {
                id: CartLineId::new("gid://line/1"),
                merchandise: CartMerchandise {
                    id: ProductVariantId::new("gid://v1"),
                    title: None,
                },
                quantity,
            }],
        }
    }

    #[test]
    fn test_describe_update() {
        assert_eq!(
            describe_update(&CartUpdate::Created(cart(1))),
            "Created cart gid://cart/1 (1 items)"
        );
        assert_eq!(
            describe_update(&CartUpdate::LinesAdded(cart(3))),
            "Added to cart gid://cart/1 (3 items)"
        );
    }
}
