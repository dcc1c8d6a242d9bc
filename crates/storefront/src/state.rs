//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{CartError, CartSession, FileCartIdStore};
use crate::config::StorefrontConfig;
use crate::shopify::StorefrontClient;

/// Cart session backed by the live Storefront API and the on-disk store.
pub type StorefrontCartSession = CartSession<StorefrontClient, FileCartIdStore>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The process holds a single cart
/// session, the same way one browser profile holds one cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    cart: StorefrontCartSession,
}

impl AppState {
    /// Create the application state, reading any stored cart ID.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the cart store exists but is unreadable.
    pub async fn new(config: StorefrontConfig) -> Result<Self, CartError> {
        let storefront = StorefrontClient::new(&config.shopify, config.limits);
        let store = FileCartIdStore::new(&config.cart_store_path);
        let cart = CartSession::open(storefront.clone(), store).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                cart,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the process-wide cart session.
    #[must_use]
    pub fn cart(&self) -> &StorefrontCartSession {
        &self.inner.cart
    }
}
