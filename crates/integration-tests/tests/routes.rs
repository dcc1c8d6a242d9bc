//! Integration tests for the storefront HTTP surface.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use vanilla_connector_integration_tests::{
    FakeShopify, cart_response, cart_user_error_response, graphql_error_response, product_node,
    products_response,
};
use vanilla_connector_storefront::app;
use vanilla_connector_storefront::state::AppState;

async fn setup() -> (FakeShopify, Router, tempfile::TempDir) {
    let fake = FakeShopify::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(fake.config(&dir.path().join("storage.json")))
        .await
        .unwrap();
    (fake, app(state), dir)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn add_to_cart(variant_id: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/cart/add")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("variant_id={variant_id}")))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (_fake, app, _dir) = setup().await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

// =============================================================================
// Listing page
// =============================================================================

#[tokio::test]
async fn test_index_renders_cards() {
    let (fake, app, _dir) = setup().await;
    fake.respond_json(&products_response(vec![
        product_node("p1", "Shirt", Some("img-1.png"), "variant-1", "19.99", "USD"),
        product_node("p2", "Mug", None, "variant-2", "8.50", "EUR"),
    ]));

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<h2>Shirt</h2>"));
    assert!(html.contains("Price: 19.99 USD"));
    assert!(html.contains(r#"src="img-1.png""#));
    assert!(html.contains(r#"value="variant-1""#));
    assert!(html.contains("Price: 8.50 EUR"));
    assert_eq!(html.matches("class=\"product-card\"").count(), 2);
    assert!(!html.contains("notice-error"));
}

#[tokio::test]
async fn test_index_escapes_product_text() {
    let (fake, app, _dir) = setup().await;
    fake.respond_json(&products_response(vec![product_node(
        "p1",
        "<script>alert(1)</script>",
        None,
        "variant-1",
        "1.00",
        "USD",
    )]));

    let html = body_text(app.oneshot(get("/")).await.unwrap()).await;

    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("alert(1)"));
    assert!(html.contains("&#60;script&#62;"));
}

#[tokio::test]
async fn test_index_shows_notice_on_failure() {
    let (fake, app, _dir) = setup().await;
    fake.respond_json(&graphql_error_response("Access denied"));

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Could not load products"));
    assert!(!html.contains("class=\"product-card\""));
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_to_cart_then_show() {
    let (fake, app, _dir) = setup().await;
    fake.respond_json(&cart_response("cartCreate", "cart-1", &[("variant-1", 1)]));

    let response = app
        .clone()
        .oneshot(add_to_cart("variant-1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("HX-Trigger").unwrap(),
        "cart-updated"
    );
    let fragment = body_text(response).await;
    assert!(fragment.contains("Cart created."));
    assert!(fragment.contains("1 item in cart."));

    let response = app.oneshot(get("/cart")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json, serde_json::json!({ "cart_id": "cart-1" }));
}

#[tokio::test]
async fn test_show_without_cart() {
    let (_fake, app, _dir) = setup().await;

    let response = app.oneshot(get("/cart")).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json, serde_json::json!({ "cart_id": null }));
}

#[tokio::test]
async fn test_add_to_cart_requires_variant() {
    let (fake, app, _dir) = setup().await;

    let response = app.oneshot(add_to_cart("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_add_to_cart_failure_returns_error_fragment() {
    let (fake, app, _dir) = setup().await;
    fake.respond_json(&cart_user_error_response("cartCreate", "Merchandise not found"));

    let response = app
        .clone()
        .oneshot(add_to_cart("variant-9"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let fragment = body_text(response).await;
    assert!(fragment.contains("Error adding to cart: Merchandise not found"));

    let json: serde_json::Value =
        serde_json::from_str(&body_text(app.oneshot(get("/cart")).await.unwrap()).await).unwrap();
    assert_eq!(json, serde_json::json!({ "cart_id": null }));
}
