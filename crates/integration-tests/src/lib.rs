//! Integration tests for Vanilla Connector.
//!
//! Tests run the real `StorefrontClient` against [`FakeShopify`], a local axum
//! server that records every request and answers from a scripted queue.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vanilla-connector-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `products` - Listing query and card rendering
//! - `cart` - Cart creation, persistence and line additions
//! - `routes` - HTTP surface of the storefront server

use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use vanilla_connector_storefront::config::{
    DEFAULT_API_VERSION, ListingLimits, ShopifyStorefrontConfig, StorefrontConfig,
};

/// Access token every test client sends.
pub const TEST_ACCESS_TOKEN: &str = "test-storefront-token";

// =============================================================================
// Recorded requests
// =============================================================================

/// One request received by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub content_type: Option<String>,
    pub access_token: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Body parsed as JSON, for cart mutations.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// `operationName` of a JSON request.
    #[must_use]
    pub fn operation_name(&self) -> Option<String> {
        self.json()?
            .get("operationName")?
            .as_str()
            .map(str::to_string)
    }

    /// A variable of a JSON request.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<Value> {
        self.json()?.get("variables")?.get(name).cloned()
    }
}

// =============================================================================
// Scripted responses
// =============================================================================

/// Response the fake server sends for the next request.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    status: StatusCode,
    retry_after: Option<u64>,
    body: String,
}

impl ScriptedResponse {
    /// A 200 response with a JSON body.
    #[must_use]
    pub fn json(body: &Value) -> Self {
        Self {
            status: StatusCode::OK,
            retry_after: None,
            body: body.to_string(),
        }
    }

    /// A response with an arbitrary status and raw body.
    #[must_use]
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    /// A 429 carrying `Retry-After`.
    #[must_use]
    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            retry_after: Some(retry_after),
            body: String::new(),
        }
    }
}

impl IntoResponse for ScriptedResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if let Some(secs) = self.retry_after {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        (self.status, headers, self.body).into_response()
    }
}

// =============================================================================
// FakeShopify
// =============================================================================

#[derive(Default)]
struct Shared {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<ScriptedResponse>>,
}

/// Local stand-in for the Storefront API.
///
/// Requests are answered in the order responses were queued. A request with
/// nothing queued gets a 500.
pub struct FakeShopify {
    addr: SocketAddr,
    shared: Arc<Shared>,
    server: JoinHandle<()>,
}

impl FakeShopify {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let shared = Arc::new(Shared::default());

        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&shared));

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            shared,
            server,
        })
    }

    /// Queue the response for the next request.
    pub fn respond(&self, response: ScriptedResponse) {
        self.shared
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Queue a 200 JSON response.
    pub fn respond_json(&self, body: &Value) {
        self.respond(ScriptedResponse::json(body));
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `operationName`s of the JSON requests received so far.
    #[must_use]
    pub fn operations(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(RecordedRequest::operation_name)
            .collect()
    }

    /// Base URL of the fake shop.
    #[must_use]
    pub fn shop_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr))
            .unwrap_or_else(|e| panic!("local socket address is a valid URL: {e}"))
    }

    /// Configuration pointing at this server, with the cart ID stored at
    /// `cart_store_path`.
    #[must_use]
    pub fn config(&self, cart_store_path: &Path) -> StorefrontConfig {
        self.config_with_limits(cart_store_path, ListingLimits::default())
    }

    /// Like [`FakeShopify::config`], with custom connection sizes.
    #[must_use]
    pub fn config_with_limits(
        &self,
        cart_store_path: &Path,
        limits: ListingLimits,
    ) -> StorefrontConfig {
        StorefrontConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            shopify: ShopifyStorefrontConfig {
                shop_url: self.shop_url(),
                api_version: DEFAULT_API_VERSION.to_string(),
                access_token: SecretString::from(TEST_ACCESS_TOKEN),
            },
            limits,
            cart_store_path: cart_store_path.to_path_buf(),
            sentry_dsn: None,
        }
    }
}

impl Drop for FakeShopify {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    shared
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            path: uri.path().to_string(),
            content_type: header_str(header::CONTENT_TYPE.as_str()),
            access_token: header_str("x-shopify-storefront-access-token"),
            body: String::from_utf8_lossy(&body).into_owned(),
        });

    let next = shared
        .responses
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front();

    next.map_or_else(
        || (StatusCode::INTERNAL_SERVER_ERROR, "no scripted response").into_response(),
        IntoResponse::into_response,
    )
}

// =============================================================================
// Response fixtures
// =============================================================================

/// A product node as the listing query returns it.
#[must_use]
pub fn product_node(
    id: &str,
    title: &str,
    image_url: Option<&str>,
    variant_id: &str,
    amount: &str,
    currency_code: &str,
) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "featuredImage": image_url.map(|url| json!({ "id": format!("{id}/image"), "url": url })),
        "variants": {
            "edges": [{
                "node": {
                    "id": variant_id,
                    "title": "Default Title",
                    "priceV2": { "amount": amount, "currencyCode": currency_code }
                }
            }]
        }
    })
}

/// A listing response holding the given product nodes.
#[must_use]
pub fn products_response(nodes: Vec<Value>) -> Value {
    let edges: Vec<Value> = nodes.into_iter().map(|node| json!({ "node": node })).collect();
    json!({ "data": { "products": { "edges": edges } } })
}

/// A successful cart mutation response; `lines` are `(variant_id, quantity)`.
#[must_use]
pub fn cart_response(operation: &str, cart_id: &str, lines: &[(&str, i64)]) -> Value {
    let edges: Vec<Value> = lines
        .iter()
        .enumerate()
        .map(|(i, (variant_id, quantity))| {
            json!({
                "node": {
                    "id": format!("{cart_id}/line/{i}"),
                    "merchandise": { "id": variant_id, "title": "Default Title" },
                    "quantity": quantity
                }
            })
        })
        .collect();

    json!({
        "data": {
            operation: {
                "cart": { "id": cart_id, "lines": { "edges": edges } },
                "userErrors": []
            }
        }
    })
}

/// A cart mutation response carrying user errors and no cart.
#[must_use]
pub fn cart_user_error_response(operation: &str, message: &str) -> Value {
    json!({
        "data": {
            operation: {
                "cart": null,
                "userErrors": [{ "field": ["lines", "0", "merchandiseId"], "message": message }]
            }
        }
    })
}

/// A top-level GraphQL error response.
#[must_use]
pub fn graphql_error_response(message: &str) -> Value {
    json!({ "errors": [{ "message": message }] })
}
