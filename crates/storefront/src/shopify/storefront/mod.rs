//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` envelopes with `reqwest` 0.13 for HTTP. Nothing is
//! cached: every listing and every cart mutation is a fresh request.

mod conversions;
pub mod queries;

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use vanilla_connector_core::CartId;

use crate::config::{ListingLimits, ShopifyStorefrontConfig};
use crate::shopify::types::{Cart, CartLineInput, Product};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use conversions::{cart_from_payload, convert_products};
use queries::{AddToCart, CreateCart, add_to_cart, create_cart, get_products, products_query};

/// Header carrying the storefront access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    limits: ListingLimits,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig, limits: ListingLimits) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                access_token: config.access_token.clone(),
                limits,
            }),
        }
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    fn post(&self) -> reqwest::RequestBuilder {
        self.inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
    }

    /// Execute a GraphQL operation as a JSON body with variables.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .post()
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await?;

        read_response(response).await
    }

    /// Execute a raw GraphQL document posted as `application/graphql`.
    async fn execute_document<T: DeserializeOwned>(
        &self,
        document: String,
    ) -> Result<T, ShopifyError> {
        let response = self
            .post()
            .header(CONTENT_TYPE, "application/graphql")
            .body(document)
            .send()
            .await?;

        read_response(response).await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch the first page of products, each with its first variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API reports errors, or a
    /// product comes back without a usable variant.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ShopifyError> {
        let limits = self.inner.limits;
        let document = products_query(limits.product_count, limits.variant_count);

        let data: get_products::ResponseData = self.execute_document(document).await?;
        let products = convert_products(data)?;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    // =========================================================================
    // Cart Methods (never cached - mutable state)
    // =========================================================================

    /// Create a new cart holding the given lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        let variables = create_cart::Variables {
            lines,
            line_count: i64::from(self.inner.limits.cart_line_count),
        };

        let data = self.execute::<CreateCart>(variables).await?;
        cart_from_payload(data.cart_create, create_cart::OPERATION_NAME)
    }

    /// Add lines to an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = add_to_cart::Variables {
            cart_id: cart_id.to_string(),
            lines,
            line_count: i64::from(self.inner.limits.cart_line_count),
        };

        let data = self.execute::<AddToCart>(variables).await?;
        cart_from_payload(data.cart_lines_add, add_to_cart::OPERATION_NAME)
    }
}

/// Turn an HTTP response into GraphQL data or a `ShopifyError`.
async fn read_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ShopifyError> {
    let status = response.status();

    // Rate limiting is reported, never retried
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ShopifyError::RateLimited(retry_after));
    }

    // Get response body as text first for better error diagnostics
    let response_text = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %excerpt(&response_text, 500),
            "Shopify API returned non-success status"
        );
        return Err(ShopifyError::message(format!(
            "HTTP {status}: {}",
            excerpt(&response_text, 200)
        )));
    }

    let response: Response<T> = match serde_json::from_str(&response_text) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %excerpt(&response_text, 500),
                "Failed to parse Shopify GraphQL response"
            );
            return Err(ShopifyError::Parse(e));
        }
    };

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        debug!(errors = ?errors, "GraphQL errors in response");
        return Err(ShopifyError::GraphQL(
            errors.into_iter().map(convert_graphql_error).collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            body = %excerpt(&response_text, 500),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::message("No data in response")
    })
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn excerpt(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("blåbær", 3), "blå");
        assert_eq!(excerpt("ok", 10), "ok");
    }

    #[test]
    fn test_convert_graphql_error_path() {
        let error: graphql_client::Error = serde_json::from_value(serde_json::json!({
            "message": "Throttled",
            "locations": [{ "line": 2, "column": 5 }],
            "path": ["products", 1]
        }))
        .unwrap();

        let converted = convert_graphql_error(error);
        assert_eq!(converted.message, "Throttled");
        assert_eq!(converted.locations[0].line, 2);
        assert_eq!(
            converted.path,
            vec![
                serde_json::Value::String("products".to_string()),
                serde_json::Value::Number(1.into()),
            ]
        );
    }
}
