//! Cart route handlers.
//!
//! The cart lives in the visitor session. Every mutation loads it, applies
//! the change and writes it back. Plain form posts are answered with a
//! redirect; HTMX requests get the refreshed cart badge instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use soltana_core::NewCartItem;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session::{load_cart, load_favorites, save_cart};
use crate::routes::views::{CartView, NavView};
use crate::state::AppState;

/// Largest quantity accepted in a single add.
pub const MAX_ADD_QUANTITY: u32 = 99;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub quantity: Option<u32>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|v| v.as_bytes() == b"true")
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    let favorites = load_favorites(&session).await?;

    Ok(CartShowTemplate {
        nav: NavView::new(&cart, &favorites),
        cart: CartView::from(&cart),
    })
}

/// Add a product to the cart.
///
/// The quantity defaults to 1 and is clamped to `1..=MAX_ADD_QUANTITY`.
///
/// # Errors
///
/// Returns 404 for an id that is not in the catalog.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .content()
        .catalog()
        .get(&form.id)
        .ok_or_else(|| AppError::NotFound(format!("produit {}", form.id)))?;
    let quantity = form.quantity.unwrap_or(1).clamp(1, MAX_ADD_QUANTITY);

    let mut cart = load_cart(&session).await?;
    let item = NewCartItem::from(product);
    for _ in 0..quantity {
        cart.add(item.clone());
    }
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", form.id.as_str())]));
    tracing::info!(product_id = %form.id, quantity, "Added to cart");

    if is_htmx(&headers) {
        return Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response());
    }
    Ok(Redirect::to("/cart").into_response())
}

/// Remove a product from the cart. Unknown ids leave the cart unchanged.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.remove(&form.id);
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}
