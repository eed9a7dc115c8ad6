//! Menu (catalog) route handler.
//!
//! Filters arrive as a plain GET form. Category and ingredient checkboxes
//! repeat their key (`?category=Moderne&category=Chocolat`), so the query is
//! parsed by hand rather than through `Query<T>`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{RawQuery, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use soltana_core::{CATEGORIES, CatalogFilter, INGREDIENTS, Price, PriceRange};

use crate::error::Result;
use crate::filters;
use crate::models::session::{load_cart, load_favorites};
use crate::routes::views::{FilterOption, NavView, ProductView};
use crate::state::AppState;

/// Raw menu form values, kept as typed so the form can be re-filled.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MenuQuery {
    pub search: String,
    pub min: String,
    pub max: String,
    pub categories: Vec<String>,
    pub ingredients: Vec<String>,
}

impl MenuQuery {
    /// Parse a raw query string.
    ///
    /// Unknown keys are ignored, and so are category or ingredient labels
    /// the menu does not offer.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let Some(raw) = raw else {
            return query;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                "q" => value.clone_into(&mut query.search),
                "min" => value.clone_into(&mut query.min),
                "max" => value.clone_into(&mut query.max),
                "category" if CATEGORIES.contains(&value) => {
                    query.categories.push(value.to_owned());
                }
                "ingredient" if INGREDIENTS.contains(&value) => {
                    query.ingredients.push(value.to_owned());
                }
                _ => {}
            }
        }
        query
    }

    /// Build the catalog filter. Unparseable price bounds are ignored.
    #[must_use]
    pub fn to_filter(&self) -> CatalogFilter {
        let bound = |s: &str| s.parse::<Price>().ok();
        let mut filter = CatalogFilter::default()
            .with_search(self.search.clone())
            .with_price(PriceRange::new(bound(&self.min), bound(&self.max)));
        for category in &self.categories {
            filter = filter.with_category(category.clone());
        }
        for ingredient in &self.ingredients {
            filter = filter.with_ingredient(ingredient.clone());
        }
        filter
    }
}

fn options(labels: &[&str], selected: &[String]) -> Vec<FilterOption> {
    labels
        .iter()
        .map(|label| FilterOption {
            label: (*label).to_string(),
            selected: selected.iter().any(|s| s == label),
        })
        .collect()
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub nav: NavView,
    pub products: Vec<ProductView>,
    pub total_count: usize,
    pub search: String,
    pub min: String,
    pub max: String,
    pub price_ceiling: String,
    pub categories: Vec<FilterOption>,
    pub ingredients: Vec<FilterOption>,
    pub active_count: usize,
}

/// Display the menu with the visitor's filters applied.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    let favorites = load_favorites(&session).await?;

    let query = MenuQuery::parse(raw.as_deref());
    let filter = query.to_filter();
    let catalog = state.content().catalog();
    let products = catalog.filter(&filter);

    tracing::debug!(
        matched = products.len(),
        active = filter.active_count(),
        "Menu filtered"
    );

    Ok(MenuTemplate {
        nav: NavView::new(&cart, &favorites),
        products: ProductView::list(products, &favorites),
        total_count: catalog.len(),
        price_ceiling: catalog.price_ceiling().amount().ceil().to_string(),
        categories: options(catalog.categories(), &query.categories),
        ingredients: options(catalog.ingredients(), &query.ingredients),
        active_count: filter.active_count(),
        search: query.search,
        min: query.min,
        max: query.max,
    })
}
