//! GraphQL documents and response shapes for the Shopify Storefront API.
//!
//! The cart mutations implement `graphql_client::GraphQLQuery` by hand so they
//! flow through the same JSON `execute` path as generated queries would. The
//! product query is plain text: it is posted as `application/graphql`, which
//! carries no variables, so its connection sizes are written into the document.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use crate::shopify::types::CartLineInput;

// =============================================================================
// Product listing
// =============================================================================

/// Build the product listing document for the given connection sizes.
#[must_use]
pub fn products_query(product_count: u32, variant_count: u32) -> String {
    format!(
        r"query FirstProducts {{
    products(first: {product_count}) {{
        edges {{
            node {{
                id
                title
                description
                featuredImage {{
                    id
                    url
                }}
                variants(first: {variant_count}) {{
                    edges {{
                        node {{
                            title
                            id
                            priceV2 {{
                                amount
                                currencyCode
                            }}
                        }}
                    }}
                }}
            }}
        }}
    }}
}}"
    )
}

pub mod get_products {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Products,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Products {
        pub edges: Vec<ProductEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductEdge {
        pub node: ProductNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNode {
        pub id: String,
        pub title: Option<String>,
        pub description: Option<String>,
        pub featured_image: Option<ImageNode>,
        pub variants: Variants,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ImageNode {
        pub id: Option<String>,
        pub url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Variants {
        pub edges: Vec<VariantEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantEdge {
        pub node: VariantNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantNode {
        pub id: String,
        pub title: Option<String>,
        #[serde(rename = "priceV2")]
        pub price_v2: MoneyV2,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyV2 {
        pub amount: String,
        pub currency_code: String,
    }
}

// =============================================================================
// Cart mutations
// =============================================================================

/// Selection shared by both cart mutations.
macro_rules! cart_selection {
    () => {
        r"
      cart {
        id
        lines(first: $lineCount) {
          edges {
            node {
              id
              merchandise {
                ... on ProductVariant {
                  id
                  title
                }
              }
              quantity
            }
          }
        }
      }
      userErrors {
        field
        message
      }"
    };
}

#[cfg(test)]
const CART_SELECTION: &str = cart_selection!();

pub const CART_CREATE_MUTATION: &str = concat!(
    r"mutation cartCreate($lines: [CartLineInput!]!, $lineCount: Int!) {
    cartCreate(input: {lines: $lines}) {",
    cart_selection!(),
    r"
    }
  }"
);

pub const CART_LINES_ADD_MUTATION: &str = concat!(
    r"mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!, $lineCount: Int!) {
    cartLinesAdd(cartId: $cartId, lines: $lines) {",
    cart_selection!(),
    r"
    }
  }"
);

/// Cart fields returned by both mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct CartFields {
    pub id: String,
    #[serde(default)]
    pub lines: CartLines,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartLines {
    pub edges: Vec<CartLineEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineEdge {
    pub node: CartLineNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineNode {
    pub id: String,
    pub merchandise: Option<MerchandiseNode>,
    pub quantity: i64,
}

/// Only `ProductVariant` merchandise selects fields; anything else is `{}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchandiseNode {
    pub id: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Payload of `cartCreate` and `cartLinesAdd`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<CartFields>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

pub struct CreateCart;

pub mod create_cart {
    use super::{CartLineInput, CartPayload, Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "cartCreate";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub lines: Vec<CartLineInput>,
        pub line_count: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartPayload>,
    }
}

impl GraphQLQuery for CreateCart {
    type Variables = create_cart::Variables;
    type ResponseData = create_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: CART_CREATE_MUTATION,
            operation_name: create_cart::OPERATION_NAME,
        }
    }
}

pub struct AddToCart;

pub mod add_to_cart {
    use super::{CartLineInput, CartPayload, Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "cartLinesAdd";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
        pub line_count: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartPayload>,
    }
}

impl GraphQLQuery for AddToCart {
    type Variables = add_to_cart::Variables;
    type ResponseData = add_to_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: CART_LINES_ADD_MUTATION,
            operation_name: add_to_cart::OPERATION_NAME,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vanilla_connector_core::ProductVariantId;

    use super::*;

    #[test]
    fn test_products_query_embeds_limits() {
        let query = products_query(2, 1);
        assert!(query.contains("products(first: 2)"));
        assert!(query.contains("variants(first: 1)"));
        assert!(query.contains("priceV2"));
        assert!(query.contains("featuredImage"));

        let query = products_query(25, 4);
        assert!(query.contains("products(first: 25)"));
        assert!(query.contains("variants(first: 4)"));
    }

    #[test]
    fn test_mutations_share_cart_selection() {
        for document in [CART_CREATE_MUTATION, CART_LINES_ADD_MUTATION] {
            assert!(document.contains(CART_SELECTION));
            assert!(document.contains("lines(first: $lineCount)"));
        }
        assert!(CART_CREATE_MUTATION.contains("cartCreate(input: {lines: $lines})"));
        assert!(CART_LINES_ADD_MUTATION.contains("cartLinesAdd(cartId: $cartId, lines: $lines)"));
    }

    #[test]
    fn test_create_cart_body() {
        let body = CreateCart::build_query(create_cart::Variables {
            lines: vec![CartLineInput::single(ProductVariantId::new("gid://v1"))],
            line_count: 5,
        });
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["operationName"], "cartCreate");
        assert_eq!(json["query"], CART_CREATE_MUTATION);
        assert_eq!(
            json["variables"],
            serde_json::json!({
                "lines": [{ "merchandiseId": "gid://v1", "quantity": 1 }],
                "lineCount": 5
            })
        );
    }

    #[test]
    fn test_add_to_cart_body() {
        let body = AddToCart::build_query(add_to_cart::Variables {
            cart_id: "gid://shopify/Cart/abc".to_string(),
            lines: vec![CartLineInput::single(ProductVariantId::new("gid://v2"))],
            line_count: 5,
        });
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["operationName"], "cartLinesAdd");
        assert_eq!(json["variables"]["cartId"], "gid://shopify/Cart/abc");
        assert_eq!(json["variables"]["lines"][0]["merchandiseId"], "gid://v2");
    }

    #[test]
    fn test_cart_payload_tolerates_missing_lines_and_errors() {
        let data: create_cart::ResponseData =
            serde_json::from_str(r#"{"cartCreate":{"cart":{"id":"gid://cart/1"}}}"#).unwrap();
        let payload = data.cart_create.unwrap();
        assert_eq!(payload.cart.unwrap().id, "gid://cart/1");
        assert!(payload.user_errors.is_empty());
    }
}
