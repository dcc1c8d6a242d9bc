//! Product listing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::catalog::{self, ProductContainer};
use crate::error::AppError;
use crate::state::AppState;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub container: ProductContainer,
    /// Notice shown in place of the cards when the listing failed.
    pub error: Option<String>,
}

/// Display the product listing.
///
/// A failed listing still renders the page, with an empty container and an
/// error notice.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let mut container = ProductContainer::new();

    let error = match catalog::render_products(state.storefront(), &mut container).await {
        Ok(_) => None,
        Err(e) => {
            let err = AppError::from(e);
            err.report();
            Some(format!("Could not load products: {}", err.public_message()))
        }
    };

    IndexTemplate { container, error }
}
