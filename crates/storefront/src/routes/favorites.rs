//! Favorites route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use soltana_core::ProductId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::session::{load_cart, load_favorites, save_favorites};
use crate::routes::views::{NavView, ProductView};
use crate::state::AppState;

/// Toggle favorite form data.
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteForm {
    pub id: String,
    /// Local path to go back to after toggling.
    pub return_to: Option<String>,
}

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites.html")]
pub struct FavoritesTemplate {
    pub nav: NavView,
    pub products: Vec<ProductView>,
}

/// Only same-site absolute paths are followed.
fn safe_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") =>
        {
            path
        }
        _ => "/favorites",
    }
}

/// Display the visitor's favorites, in catalog order.
///
/// Ids that are no longer in the catalog are skipped.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    let favorites = load_favorites(&session).await?;

    let products = state
        .content()
        .catalog()
        .products()
        .iter()
        .filter(|p| favorites.contains(p.id.as_str()));

    Ok(FavoritesTemplate {
        nav: NavView::new(&cart, &favorites),
        products: ProductView::list(products, &favorites),
    })
}

/// Add or remove a product from the favorites.
///
/// # Errors
///
/// Returns 404 for an id that is not in the catalog.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ToggleFavoriteForm>,
) -> Result<Redirect> {
    if state.content().catalog().get(&form.id).is_none() {
        return Err(AppError::NotFound(format!("produit {}", form.id)));
    }

    let mut favorites = load_favorites(&session).await?;
    let added = favorites.toggle(ProductId::new(form.id.as_str()));
    save_favorites(&session, &favorites).await?;
    tracing::info!(product_id = %form.id, added, "Favorite toggled");

    Ok(Redirect::to(safe_return_path(form.return_to.as_deref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path(Some("/menu?category=Moderne")), "/menu?category=Moderne");
        assert_eq!(safe_return_path(Some("//evil.example")), "/favorites");
        assert_eq!(safe_return_path(Some("/\\evil.example")), "/favorites");
        assert_eq!(safe_return_path(Some("https://evil.example")), "/favorites");
        assert_eq!(safe_return_path(None), "/favorites");
    }
}
