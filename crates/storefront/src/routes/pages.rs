//! Static content page route handlers.
//!
//! Serves the markdown-based About and Contact pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::views::NavView;
use crate::services::whatsapp;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub nav: NavView,
    pub title: String,
    pub description: String,
    pub content_html: String,
    pub whatsapp_url: String,
}

/// Serve a content page by slug.
async fn serve_content_page(
    state: &AppState,
    session: &Session,
    slug: &str,
) -> Result<ContentPageTemplate> {
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        nav: NavView::load(session).await?,
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        content_html: page.content_html.clone(),
        whatsapp_url: whatsapp::wa_me_link(&state.config().whatsapp.number, "Bonjour Soltana !"),
    })
}

/// Display the About page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, session))]
pub async fn about(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    serve_content_page(&state, &session, "about").await
}

/// Display the Contact page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, session))]
pub async fn contact(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    serve_content_page(&state, &session, "contact").await
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/contact", get(contact))
}
