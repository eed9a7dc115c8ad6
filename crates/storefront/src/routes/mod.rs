//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (signature creations)
//! GET  /menu                   - Catalog with filters
//! GET  /product/{id}           - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (redirect, or badge fragment for HTMX)
//! POST /cart/remove            - Remove a product
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Favorites
//! GET  /favorites              - Favorite products
//! POST /favorites/toggle       - Add or remove a favorite
//!
//! # Checkout (rate limited on POST)
//! GET  /order                  - Checkout form and summary
//! POST /order                  - Hand the order to WhatsApp or email
//! POST /api/send-order         - JSON order notification relay
//!
//! # Pages
//! GET  /about                  - About page
//! GET  /contact                - Contact page
//! ```

pub mod api;
pub mod cart;
pub mod favorites;
pub mod home;
pub mod menu;
pub mod order;
pub mod pages;
pub mod products;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::order_rate_limiter;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::show))
        .route("/toggle", post(favorites::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    // One limiter shared by both order endpoints
    let limiter = order_rate_limiter();

    Router::new()
        .route("/", get(home::home))
        .route("/menu", get(menu::index))
        .route("/product/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/favorites", favorites_routes())
        .route(
            "/order",
            get(order::show).merge(post(order::submit).layer(limiter.clone())),
        )
        .route("/api/send-order", post(api::send_order).layer(limiter))
        .merge(pages::router())
}
