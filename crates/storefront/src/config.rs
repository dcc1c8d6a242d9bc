//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Host-injected
//! - `VANILLA_CONNECTOR` - Storefront API access token. Not validated locally;
//!   when absent every Shopify call fails with the platform's authorization error.
//!
//! ## Optional
//! - `SHOPIFY_SHOP_URL` - Shop base URL (default: <https://eplehusettest.myshopify.com>)
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-07)
//! - `CATALOG_PRODUCT_COUNT` - Products requested per listing (default: 2)
//! - `CATALOG_VARIANT_COUNT` - Variants requested per product (default: 1)
//! - `CART_LINE_COUNT` - Cart lines returned by cart mutations (default: 5)
//! - `CART_STORE_PATH` - Cart ID store file (default: `<data dir>/vanilla-connector/storage.json`)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

pub const DEFAULT_SHOP_URL: &str = "https://eplehusettest.myshopify.com";
pub const DEFAULT_API_VERSION: &str = "2024-07";

/// Logged at startup when no access token is configured.
pub const MISSING_TOKEN_WARNING: &str =
    "VANILLA_CONNECTOR is not set; Storefront API calls will be rejected as unauthorized";

/// Shopify rejects connection sizes outside `1..=250`.
const MAX_CONNECTION_SIZE: u32 = 250;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Connection sizes used by the listing query and cart mutations
    pub limits: ListingLimits,
    /// File holding the persisted cart ID
    pub cart_store_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shop base URL (e.g., <https://your-store.myshopify.com>)
    pub shop_url: Url,
    /// Shopify API version (e.g., 2024-07)
    pub api_version: String,
    /// Storefront API access token, sent as `X-Shopify-Storefront-Access-Token`
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("shop_url", &self.shop_url.as_str())
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Connection sizes for the fixed-size listing and cart snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLimits {
    /// `products(first: N)`
    pub product_count: u32,
    /// `variants(first: N)` per product
    pub variant_count: u32,
    /// `lines(first: N)` in cart mutation responses
    pub cart_line_count: u32,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self {
            product_count: 2,
            variant_count: 1,
            cart_line_count: 5,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_or_default(&lookup, "STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_or_default(&lookup, "STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let shopify = ShopifyStorefrontConfig::from_lookup(&lookup)?;
        let limits = ListingLimits::from_lookup(&lookup)?;
        let cart_store_path = lookup("CART_STORE_PATH")
            .map_or_else(default_cart_store_path, PathBuf::from);
        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());

        Ok(Self {
            host,
            port,
            shopify,
            limits,
            cart_store_path,
            sentry_dsn,
        })
    }

    /// Problems worth a startup warning but not a refusal to start.
    ///
    /// Call after logging is initialized and log each entry at warn level.
    #[must_use]
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if !self.shopify.has_access_token() {
            warnings.push(MISSING_TOKEN_WARNING);
        }
        warnings
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyStorefrontConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_or_default(lookup, "SHOPIFY_SHOP_URL", DEFAULT_SHOP_URL);
        let shop_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPIFY_SHOP_URL".to_string(), e.to_string()))?;
        if !matches!(shop_url.scheme(), "http" | "https") || shop_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_SHOP_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let access_token = lookup("VANILLA_CONNECTOR").unwrap_or_default();

        Ok(Self {
            shop_url,
            api_version: get_or_default(lookup, "SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            access_token: SecretString::from(access_token),
        })
    }

    /// The GraphQL endpoint, `{shop_url}/api/{api_version}/graphql`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/api/{}/graphql",
            self.shop_url.as_str().trim_end_matches('/'),
            self.api_version
        )
    }

    /// Whether an access token was supplied by the host environment.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        !self.access_token.expose_secret().is_empty()
    }
}

impl ListingLimits {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            product_count: get_count(lookup, "CATALOG_PRODUCT_COUNT", defaults.product_count)?,
            variant_count: get_count(lookup, "CATALOG_VARIANT_COUNT", defaults.variant_count)?,
            cart_line_count: get_count(lookup, "CART_LINE_COUNT", defaults.cart_line_count)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Get a GraphQL connection size, rejecting values Shopify would refuse.
fn get_count(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u32,
) -> Result<u32, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if value == 0 || value > MAX_CONNECTION_SIZE {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 1 and {MAX_CONNECTION_SIZE} (got {value})"),
        ));
    }

    Ok(value)
}

/// Platform data directory, falling back to the working directory.
fn default_cart_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vanilla-connector")
        .join("storage.json")
}
