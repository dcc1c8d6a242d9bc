//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cart::CartError;
use crate::shopify::ShopifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Add-to-cart flow failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Shopify(ShopifyError::RateLimited(_))
            | Self::Cart(CartError::Shopify(ShopifyError::RateLimited(_))) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Self::Shopify(_) | Self::Cart(CartError::Shopify(_)) => StatusCode::BAD_GATEWAY,
            Self::Cart(CartError::Store(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Shopify(ShopifyError::RateLimited(secs))
            | Self::Cart(CartError::Shopify(ShopifyError::RateLimited(secs))) => {
                format!("Too many requests, retry in {secs}s")
            }
            Self::Shopify(ShopifyError::UserError(msg))
            | Self::Cart(CartError::Shopify(ShopifyError::UserError(msg))) => msg.clone(),
            Self::Shopify(_) | Self::Cart(CartError::Shopify(_)) => {
                "External service error".to_string()
            }
            Self::Cart(CartError::Store(_)) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::BadRequest(_) => self.to_string(),
        }
    }

    /// Log the error and, for server-side failures, report it to Sentry.
    pub fn report(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        (self.status(), self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
