//! Product identifiers.
//!
//! Products are keyed by a short string slug (e.g. `baklawa-pistache`) that
//! also appears in product URLs, so the ID wraps a `String` rather than an
//! integer.

use core::fmt;
use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// A product identifier.
///
/// Equality is exact and case-sensitive; the cart relies on it to keep at
/// most one entry per product.
///
/// ```
/// use soltana_core::ProductId;
///
/// let id = ProductId::new("makroudh");
/// assert_eq!(id.as_str(), "makroudh");
/// assert_eq!(id.to_string(), "makroudh");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the ID and return its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
