//! Cart session: resolves whether a cart exists and mutates it.
//!
//! # States
//!
//! ```text
//! NoCart ──add_to_cart──▶ HasCart(id)   cartCreate, id persisted
//! HasCart(id) ──add_to_cart──▶ HasCart(id)   cartLinesAdd with cartId = id
//! ```
//!
//! The initial state is read once from the [`CartIdStore`] when the session is
//! opened. A failed mutation never changes the state or the store.
//!
//! Each `add_to_cart` holds the session lock across its single outbound call,
//! so two add-to-cart requests racing on `NoCart` cannot both create a cart.

pub mod store;

use std::future::Future;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use vanilla_connector_core::{CartId, ProductVariantId};

use crate::shopify::{Cart, CartLineInput, ShopifyError, StorefrontClient};

pub use store::{CART_ID_KEY, CartIdStore, FileCartIdStore, MemoryCartIdStore, StoreError};

/// Errors from the add-to-cart flow.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart mutation failed.
    #[error("Cart mutation failed: {0}")]
    Shopify(#[from] ShopifyError),

    /// The cart ID store could not be read.
    #[error("Cart store error: {0}")]
    Store(#[from] StoreError),
}

/// Whether a cart ID is currently held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartState {
    NoCart,
    HasCart(CartId),
}

impl CartState {
    #[must_use]
    pub const fn cart_id(&self) -> Option<&CartId> {
        match self {
            Self::NoCart => None,
            Self::HasCart(id) => Some(id),
        }
    }
}

impl From<Option<CartId>> for CartState {
    fn from(cart_id: Option<CartId>) -> Self {
        cart_id.map_or(Self::NoCart, Self::HasCart)
    }
}

/// Result of a successful add-to-cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    /// A new cart was created holding the line.
    Created(Cart),
    /// The line was added to the held cart.
    LinesAdded(Cart),
}

impl CartUpdate {
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        match self {
            Self::Created(cart) | Self::LinesAdded(cart) => cart,
        }
    }
}

/// The two cart mutations the session needs.
pub trait CartApi: Send + Sync {
    fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;

    fn add_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;
}

impl CartApi for StorefrontClient {
    fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        Self::create_cart(self, lines)
    }

    fn add_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        self.add_to_cart(cart_id, lines)
    }
}

impl<A: CartApi> CartApi for std::sync::Arc<A> {
    fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        (**self).create_cart(lines)
    }

    fn add_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        (**self).add_cart_lines(cart_id, lines)
    }
}

// =============================================================================
// CartSession
// =============================================================================

/// Holder of the cart state and the durable store behind it.
pub struct CartSession<A, S> {
    api: A,
    store: S,
    state: Mutex<CartState>,
}

impl<A: CartApi, S: CartIdStore> CartSession<A, S> {
    /// Open a session, reading the initial state from the store.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the store exists but cannot be read.
    pub async fn open(api: A, store: S) -> Result<Self, CartError> {
        let state = CartState::from(store.load().await?);
        match &state {
            CartState::NoCart => info!("No stored cart, one will be created on first add"),
            CartState::HasCart(id) => info!(cart_id = %id, "Resuming stored cart"),
        }

        Ok(Self {
            api,
            store,
            state: Mutex::new(state),
        })
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> CartState {
        self.state.lock().await.clone()
    }

    /// Add one unit of a variant, creating the cart first if none is held.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Shopify` if the mutation fails; the held cart ID
    /// is unchanged in that case.
    #[instrument(skip(self), fields(merchandise_id = %merchandise_id))]
    pub async fn add_to_cart(
        &self,
        merchandise_id: &ProductVariantId,
    ) -> Result<CartUpdate, CartError> {
        let lines = vec![CartLineInput::single(merchandise_id.clone())];
        let mut state = self.state.lock().await;

        match &*state {
            CartState::NoCart => {
                info!("Creating a new cart");
                let cart = self.api.create_cart(lines).await?;

                // Held in memory even if the save below fails or is cancelled
                *state = CartState::HasCart(cart.id.clone());
                if let Err(e) = self.store.save(&cart.id).await {
                    error!(cart_id = %cart.id, error = %e, "Failed to persist new cart ID");
                }

                info!(cart_id = %cart.id, "New cart created");
                Ok(CartUpdate::Created(cart))
            }
            CartState::HasCart(cart_id) => {
                info!(cart_id = %cart_id, "Adding product to existing cart");
                let cart = self.api.add_cart_lines(cart_id, lines).await?;

                debug!(cart = ?cart, "Product added to cart");
                Ok(CartUpdate::LinesAdded(cart))
            }
        }
    }
}
