//! Integration tests for the add-to-cart flow.
//!
//! Each test runs a `CartSession` over the real client and the file store,
//! against a local fake Storefront API.

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use vanilla_connector_core::{CartId, ProductVariantId};
use vanilla_connector_integration_tests::{
    FakeShopify, ScriptedResponse, cart_response, cart_user_error_response,
};
use vanilla_connector_storefront::cart::{
    CART_ID_KEY, CartError, CartIdStore, CartSession, CartState, CartUpdate, FileCartIdStore,
};
use vanilla_connector_storefront::config::ListingLimits;
use vanilla_connector_storefront::shopify::{ShopifyError, StorefrontClient};

type Session = CartSession<StorefrontClient, FileCartIdStore>;

async fn open_session(fake: &FakeShopify, store_path: &Path) -> Session {
    let config = fake.config(store_path);
    let client = StorefrontClient::new(&config.shopify, config.limits);
    CartSession::open(client, FileCartIdStore::new(store_path))
        .await
        .unwrap()
}

fn stored_raw(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// Branching on cart state
// =============================================================================

#[tokio::test]
async fn test_first_add_creates_and_persists_cart() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let session = open_session(&fake, &path).await;
    assert_eq!(session.state().await, CartState::NoCart);

    fake.respond_json(&cart_response("cartCreate", "gid://cart/C1", &[("gid://v1", 1)]));

    let update = session
        .add_to_cart(&ProductVariantId::new("gid://v1"))
        .await
        .unwrap();

    assert!(matches!(update, CartUpdate::Created(_)));
    assert_eq!(update.cart().id, CartId::new("gid://cart/C1"));
    assert_eq!(
        session.state().await,
        CartState::HasCart(CartId::new("gid://cart/C1"))
    );
    assert_eq!(stored_raw(&path)[CART_ID_KEY], "gid://cart/C1");

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(requests[0].operation_name().as_deref(), Some("cartCreate"));
    assert_eq!(
        requests[0].variable("lines").unwrap(),
        json!([{ "merchandiseId": "gid://v1", "quantity": 1 }])
    );
}

#[tokio::test]
async fn test_second_add_uses_created_cart() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let session = open_session(&fake, &dir.path().join("storage.json")).await;

    fake.respond_json(&cart_response("cartCreate", "gid://cart/C1", &[("gid://v1", 1)]));
    fake.respond_json(&cart_response(
        "cartLinesAdd",
        "gid://cart/C1",
        &[("gid://v1", 1), ("gid://v2", 1)],
    ));

    session
        .add_to_cart(&ProductVariantId::new("gid://v1"))
        .await
        .unwrap();
    let update = session
        .add_to_cart(&ProductVariantId::new("gid://v2"))
        .await
        .unwrap();

    assert!(matches!(update, CartUpdate::LinesAdded(_)));
    assert_eq!(update.cart().total_quantity(), 2);
    assert_eq!(fake.operations(), ["cartCreate", "cartLinesAdd"]);

    let add = &fake.requests()[1];
    assert_eq!(add.variable("cartId").unwrap(), "gid://cart/C1");
    assert_eq!(
        add.variable("lines").unwrap(),
        json!([{ "merchandiseId": "gid://v2", "quantity": 1 }])
    );
}

#[tokio::test]
async fn test_stored_cart_survives_restart() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let session = open_session(&fake, &path).await;
        fake.respond_json(&cart_response("cartCreate", "gid://cart/C1", &[("gid://v1", 1)]));
        session
            .add_to_cart(&ProductVariantId::new("gid://v1"))
            .await
            .unwrap();
    }

    let reopened = open_session(&fake, &path).await;
    assert_eq!(
        reopened.state().await,
        CartState::HasCart(CartId::new("gid://cart/C1"))
    );

    fake.respond_json(&cart_response(
        "cartLinesAdd",
        "gid://cart/C1",
        &[("gid://v1", 2)],
    ));
    reopened
        .add_to_cart(&ProductVariantId::new("gid://v1"))
        .await
        .unwrap();

    assert_eq!(fake.operations(), ["cartCreate", "cartLinesAdd"]);
}

#[tokio::test]
async fn test_preexisting_store_skips_create() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    FileCartIdStore::new(&path)
        .save(&CartId::new("gid://cart/OLD"))
        .await
        .unwrap();

    let session = open_session(&fake, &path).await;
    fake.respond_json(&cart_response(
        "cartLinesAdd",
        "gid://cart/OLD",
        &[("gid://v3", 1)],
    ));

    session
        .add_to_cart(&ProductVariantId::new("gid://v3"))
        .await
        .unwrap();

    assert_eq!(fake.operations(), ["cartLinesAdd"]);
    assert_eq!(fake.requests()[0].variable("cartId").unwrap(), "gid://cart/OLD");
}

// =============================================================================
// Failure isolation
// =============================================================================

#[tokio::test]
async fn test_failed_create_keeps_no_cart() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let session = open_session(&fake, &path).await;

    fake.respond_json(&cart_user_error_response(
        "cartCreate",
        "The merchandise with id gid://bad does not exist.",
    ));

    let err = session
        .add_to_cart(&ProductVariantId::new("gid://bad"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CartError::Shopify(ShopifyError::UserError(ref msg)) if msg.contains("does not exist")
    ));
    assert_eq!(session.state().await, CartState::NoCart);
    assert!(!path.exists());

    // The next add tries to create again
    fake.respond_json(&cart_response("cartCreate", "gid://cart/C2", &[("gid://v1", 1)]));
    session
        .add_to_cart(&ProductVariantId::new("gid://v1"))
        .await
        .unwrap();
    assert_eq!(fake.operations(), ["cartCreate", "cartCreate"]);
}

#[tokio::test]
async fn test_failed_add_keeps_cart() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    FileCartIdStore::new(&path)
        .save(&CartId::new("gid://cart/C1"))
        .await
        .unwrap();
    let session = open_session(&fake, &path).await;

    fake.respond(ScriptedResponse::status(
        axum::http::StatusCode::BAD_GATEWAY,
        "upstream unavailable",
    ));

    let err = session
        .add_to_cart(&ProductVariantId::new("gid://v1"))
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::Shopify(ShopifyError::GraphQL(_))));
    assert_eq!(
        session.state().await,
        CartState::HasCart(CartId::new("gid://cart/C1"))
    );
    assert_eq!(stored_raw(&path)[CART_ID_KEY], "gid://cart/C1");
}

#[tokio::test]
async fn test_missing_cart_in_payload_is_an_error() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let session = open_session(&fake, &dir.path().join("storage.json")).await;

    fake.respond_json(&json!({ "data": { "cartCreate": { "cart": null, "userErrors": [] } } }));

    let err = session
        .add_to_cart(&ProductVariantId::new("gid://v1"))
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::Shopify(ShopifyError::UnexpectedShape(_))));
    assert_eq!(session.state().await, CartState::NoCart);
}

// =============================================================================
// Configuration and concurrency
// =============================================================================

#[tokio::test]
async fn test_line_count_follows_configuration() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let limits = ListingLimits {
        cart_line_count: 40,
        ..ListingLimits::default()
    };
    let config = fake.config_with_limits(&path, limits);
    let client = StorefrontClient::new(&config.shopify, config.limits);
    let session = CartSession::open(client, FileCartIdStore::new(&path))
        .await
        .unwrap();

    fake.respond_json(&cart_response("cartCreate", "gid://cart/C1", &[("gid://v1", 1)]));
    session
        .add_to_cart(&ProductVariantId::new("gid://v1"))
        .await
        .unwrap();

    assert_eq!(fake.requests()[0].variable("lineCount").unwrap(), 40);
}

#[tokio::test]
async fn test_concurrent_first_adds_create_one_cart() {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let session = Arc::new(open_session(&fake, &dir.path().join("storage.json")).await);

    fake.respond_json(&cart_response("cartCreate", "gid://cart/C1", &[("gid://v1", 1)]));
    fake.respond_json(&cart_response(
        "cartLinesAdd",
        "gid://cart/C1",
        &[("gid://v1", 2)],
    ));

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            session
                .add_to_cart(&ProductVariantId::new("gid://v1"))
                .await
        })
    };
    let second = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            session
                .add_to_cart(&ProductVariantId::new("gid://v1"))
                .await
        })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    assert_eq!(fake.operations(), ["cartCreate", "cartLinesAdd"]);
    assert_eq!(
        fake.requests()[1].variable("cartId").unwrap(),
        "gid://cart/C1"
    );
}
