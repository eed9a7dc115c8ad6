//! Session-related types.
//!
//! The visitor's cart and favorites are stored in the session. Each request
//! loads its own copy, mutates it, and writes it back.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use soltana_core::{Cart, ProductId};

/// Session keys for visitor data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's favorite product ids.
    pub const FAVORITES: &str = "favorites";
}

/// Product ids the visitor marked as favorite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(BTreeSet<ProductId>);

impl Favorites {
    /// Add `id` if absent, remove it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.0.remove(id.as_str()) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Load the cart, or an empty one if the session has none.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Persist the cart into the session.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Load the favorites, or an empty set if the session has none.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn load_favorites(
    session: &Session,
) -> Result<Favorites, tower_sessions::session::Error> {
    Ok(session
        .get::<Favorites>(keys::FAVORITES)
        .await?
        .unwrap_or_default())
}

/// Persist the favorites into the session.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn save_favorites(
    session: &Session,
    favorites: &Favorites,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::FAVORITES, favorites).await
}
