//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use soltana_core::RELATED_LIMIT;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::session::{load_cart, load_favorites};
use crate::routes::views::{NavView, ProductView};
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: ProductView,
    pub details_html: Option<String>,
    pub ingredients: Vec<String>,
    pub allergens: Vec<String>,
    pub gallery: Vec<String>,
    pub related_products: Vec<ProductView>,
    pub share_url: String,
    pub whatsapp_share_url: String,
}

/// Absolute link to a product page.
#[must_use]
pub fn share_url(base_url: &str, id: &str) -> String {
    format!("{base_url}/product/{}", urlencoding::encode(id))
}

/// Display product detail page.
///
/// # Errors
///
/// Returns 404 if no product has this id.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let catalog = state.content().catalog();
    let product = catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("produit {id}")))?;

    let cart = load_cart(&session).await?;
    let favorites = load_favorites(&session).await?;

    let share_url = share_url(&state.config().base_url, product.id.as_str());
    let whatsapp_share_url = format!(
        "https://wa.me/?text={}",
        urlencoding::encode(&format!("{} - {}", product.name, share_url))
    );

    Ok(ProductShowTemplate {
        nav: NavView::new(&cart, &favorites),
        product: ProductView::new(product, &favorites),
        details_html: state
            .content()
            .product_details(product.id.as_str())
            .map(str::to_owned),
        ingredients: product.ingredients.clone(),
        allergens: product.allergens.clone(),
        gallery: product.gallery.clone(),
        related_products: ProductView::list(
            catalog.related(product.id.as_str(), RELATED_LIMIT),
            &favorites,
        ),
        share_url,
        whatsapp_share_url,
    })
}
