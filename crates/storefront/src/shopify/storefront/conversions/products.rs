//! Product type conversion functions.

use vanilla_connector_core::{ImageId, Money, ProductId, ProductVariantId};

use crate::shopify::ShopifyError;
use crate::shopify::types::{Image, Product, ProductVariant};

use super::super::queries::get_products;

/// Convert every product in a listing response, in response order.
///
/// # Errors
///
/// Fails on the first product that lacks a variant or carries an unparsable
/// price; a listing is rendered whole or not at all.
pub fn convert_products(data: get_products::ResponseData) -> Result<Vec<Product>, ShopifyError> {
    data.products
        .edges
        .into_iter()
        .map(|edge| convert_product(edge.node))
        .collect()
}

/// Convert one product node, keeping only its first variant.
///
/// # Errors
///
/// Returns `ShopifyError::UnexpectedShape` if the product has no variants or
/// the variant price cannot be parsed.
pub fn convert_product(node: get_products::ProductNode) -> Result<Product, ShopifyError> {
    let product_id = node.id;

    let variant_node = node
        .variants
        .edges
        .into_iter()
        .next()
        .map(|edge| edge.node)
        .ok_or_else(|| {
            ShopifyError::UnexpectedShape(format!("product {product_id} has no variants"))
        })?;

    let price = Money::parse(&variant_node.price_v2.amount, &variant_node.price_v2.currency_code)
        .map_err(|e| {
            ShopifyError::UnexpectedShape(format!("variant {} price: {e}", variant_node.id))
        })?;

    Ok(Product {
        id: ProductId::new(product_id),
        title: node.title.unwrap_or_default(),
        description: node.description.unwrap_or_default(),
        featured_image: node.featured_image.map(|image| Image {
            id: image.id.map(ImageId::new),
            url: image.url,
        }),
        variant: ProductVariant {
            id: ProductVariantId::new(variant_node.id),
            title: variant_node.title,
            price,
        },
    })
}
