//! CLI command implementations.

pub mod cart;
pub mod products;

use thiserror::Error;

use vanilla_connector_storefront::cart::{CartError, StoreError};
use vanilla_connector_storefront::config::ConfigError;
use vanilla_connector_storefront::shopify::ShopifyError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Product listing failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Add-to-cart failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Cart ID store could not be read.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
