//! Display data shared by several page templates.

use tower_sessions::Session;

use soltana_core::{Cart, CartItem, Product};

use crate::error::Result;
use crate::models::Favorites;
use crate::models::session::{load_cart, load_favorites};

/// Header badges shown on every page.
#[derive(Clone, Copy, Default)]
pub struct NavView {
    pub cart_count: u32,
    pub favorites_count: usize,
}

impl NavView {
    #[must_use]
    pub fn new(cart: &Cart, favorites: &Favorites) -> Self {
        Self {
            cart_count: cart.item_count(),
            favorites_count: favorites.len(),
        }
    }

    /// Load both badges from the session.
    ///
    /// # Errors
    ///
    /// Returns error if the session store fails.
    pub async fn load(session: &Session) -> Result<Self> {
        let cart = load_cart(session).await?;
        let favorites = load_favorites(session).await?;
        Ok(Self::new(&cart, &favorites))
    }
}

/// Product card data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub categories: Vec<String>,
    pub is_favorite: bool,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, favorites: &Favorites) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            categories: product.categories.clone(),
            is_favorite: favorites.contains(product.id.as_str()),
        }
    }

    /// Build views for a list of products.
    #[must_use]
    pub fn list<'a>(
        products: impl IntoIterator<Item = &'a Product>,
        favorites: &Favorites,
    ) -> Vec<Self> {
        products
            .into_iter()
            .map(|p| Self::new(p, favorites))
            .collect()
    }
}

/// Cart line data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// A checkbox in a filter group.
#[derive(Clone)]
pub struct FilterOption {
    pub label: String,
    pub selected: bool,
}
