//! Cart type conversion functions.

use tracing::warn;

use vanilla_connector_core::{CartId, CartLineId, ProductVariantId};

use crate::shopify::ShopifyError;
use crate::shopify::types::{Cart, CartLine, CartMerchandise, CartUserError};

use super::super::queries::{CartFields, CartLineNode, CartPayload, UserError};

pub fn convert_user_error(error: UserError) -> CartUserError {
    CartUserError {
        field: error.field,
        message: error.message,
    }
}

pub fn convert_cart(cart: CartFields) -> Cart {
    Cart {
        id: CartId::new(cart.id),
        lines: cart
            .lines
            .edges
            .into_iter()
            .filter_map(|edge| convert_cart_line(edge.node))
            .collect(),
    }
}

fn convert_cart_line(node: CartLineNode) -> Option<CartLine> {
    let Some(merchandise_id) = node.merchandise.as_ref().and_then(|m| m.id.clone()) else {
        warn!(line_id = %node.id, "Cart line merchandise is not a ProductVariant, skipping");
        return None;
    };

    Some(CartLine {
        id: CartLineId::new(node.id),
        merchandise: CartMerchandise {
            id: ProductVariantId::new(merchandise_id),
            title: node.merchandise.and_then(|m| m.title),
        },
        quantity: node.quantity,
    })
}

/// Unwrap a cart mutation payload into a cart.
///
/// # Errors
///
/// Returns `ShopifyError::UserError` if the mutation reported user errors, or
/// `ShopifyError::UnexpectedShape` if the payload or its cart is missing.
pub fn cart_from_payload(
    payload: Option<CartPayload>,
    operation: &str,
) -> Result<Cart, ShopifyError> {
    let payload = payload
        .ok_or_else(|| ShopifyError::UnexpectedShape(format!("{operation} returned no payload")))?;

    if !payload.user_errors.is_empty() {
        return Err(ShopifyError::UserError(
            payload
                .user_errors
                .into_iter()
                .map(|e| convert_user_error(e).message)
                .collect::<Vec<_>>()
                .join("; "),
        ));
    }

    payload
        .cart
        .map(convert_cart)
        .ok_or_else(|| ShopifyError::UnexpectedShape(format!("{operation} returned no cart")))
}
