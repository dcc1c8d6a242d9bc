//! Cart route handlers.
//!
//! Add-to-cart returns an HTML fragment for HTMX; the first add creates the
//! cart, later adds append to it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use vanilla_connector_core::{CartId, ProductVariantId};

use crate::cart::CartUpdate;
use crate::error::AppError;
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub variant_id: String,
}

/// Successful add-to-cart fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_result.html")]
pub struct CartResultTemplate {
    pub created: bool,
    pub cart_id: CartId,
    pub total_quantity: i64,
}

impl From<&CartUpdate> for CartResultTemplate {
    fn from(update: &CartUpdate) -> Self {
        let cart = update.cart();
        Self {
            created: matches!(update, CartUpdate::Created(_)),
            cart_id: cart.id.clone(),
            total_quantity: cart.total_quantity(),
        }
    }
}

/// Failed add-to-cart fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_error.html")]
pub struct CartErrorTemplate {
    pub message: String,
}

/// Current cart state as JSON.
#[derive(Debug, Serialize)]
pub struct CartStateResponse {
    pub cart_id: Option<CartId>,
}

/// Add one unit of a variant to the cart (HTMX).
///
/// Failures render an error fragment with the error's status code.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    let variant_id = form.variant_id.trim();
    if variant_id.is_empty() {
        return error_fragment(&AppError::BadRequest("variant_id is required".to_string()));
    }

    match state
        .cart()
        .add_to_cart(&ProductVariantId::new(variant_id))
        .await
    {
        Ok(update) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartResultTemplate::from(&update),
        )
            .into_response(),
        Err(e) => error_fragment(&AppError::from(e)),
    }
}

/// Report the current cart ID, if one is held.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartStateResponse> {
    let cart_id = state.cart().state().await.cart_id().cloned();
    Json(CartStateResponse { cart_id })
}

fn error_fragment(err: &AppError) -> Response {
    err.report();
    (
        err.status(),
        CartErrorTemplate {
            message: err.public_message(),
        },
    )
        .into_response()
}
