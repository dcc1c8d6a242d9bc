//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod products;

pub use cart::cart_from_payload;
pub use products::convert_products;
