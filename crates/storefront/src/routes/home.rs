//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use soltana_core::CATEGORIES;

use crate::error::Result;
use crate::filters;
use crate::models::session::{load_cart, load_favorites};
use crate::routes::views::{NavView, ProductView};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub signature: Vec<ProductView>,
    pub categories: &'static [&'static str],
}

/// Display the home page with the signature creations.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    let favorites = load_favorites(&session).await?;

    Ok(HomeTemplate {
        nav: NavView::new(&cart, &favorites),
        signature: ProductView::list(state.content().signature_products(), &favorites),
        categories: CATEGORIES,
    })
}
