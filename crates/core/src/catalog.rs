//! Product catalog and the menu filter.
//!
//! The catalog is a fixed, read-only list of products loaded once at startup.
//! [`CatalogFilter`] narrows it for the menu page; filtering is pure and keeps
//! catalog order.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Category labels offered as menu filters.
pub const CATEGORIES: &[&str] = &["Traditionnelle", "Moderne", "Orientale", "Chocolat", "Fruits"];

/// Ingredient labels offered as menu filters.
pub const INGREDIENTS: &[&str] = &[
    "Amandes",
    "Pistaches",
    "Miel",
    "Chocolat",
    "Dattes",
    "Fleur d'oranger",
];

/// Number of related products shown on a product page.
pub const RELATED_LIMIT: usize = 4;

/// A purchasable pastry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Main image path.
    pub image: String,
    pub categories: Vec<String>,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Additional images shown as thumbnails on the product page.
    #[serde(default)]
    pub gallery: Vec<String>,
}

impl Product {
    /// Whether the product carries the given category label.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Whether the product contains the given ingredient label.
    #[must_use]
    pub fn has_ingredient(&self, ingredient: &str) -> bool {
        self.ingredients.iter().any(|i| i == ingredient)
    }

    fn shares_category_with(&self, other: &Self) -> bool {
        self.categories.iter().any(|c| other.has_category(c))
    }
}

/// Errors that can occur when building a [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two products share the same identifier.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
}

/// The full, ordered product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    /// Products matching `filter`, in catalog order.
    #[must_use]
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Other products sharing at least one category with `id`, at most `limit`.
    ///
    /// Returns an empty list for unknown IDs.
    #[must_use]
    pub fn related(&self, id: &str, limit: usize) -> Vec<&Product> {
        let Some(product) = self.get(id) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| p.id != product.id && p.shares_category_with(product))
            .take(limit)
            .collect()
    }

    /// Category labels offered by the menu filter.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn categories(&self) -> &'static [&'static str] {
        CATEGORIES
    }

    /// Ingredient labels offered by the menu filter.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn ingredients(&self) -> &'static [&'static str] {
        INGREDIENTS
    }

    /// Highest product price, or zero for an empty catalog.
    #[must_use]
    pub fn price_ceiling(&self) -> Price {
        self.products
            .iter()
            .map(|p| p.price)
            .max()
            .unwrap_or(Price::ZERO)
    }
}

/// Inclusive price bounds. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Option<Price>,
    pub max: Option<Price>,
}

impl PriceRange {
    #[must_use]
    pub const fn new(min: Option<Price>, max: Option<Price>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Menu filter configuration. The default matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive text matched against name or description.
    pub search: String,
    pub price: PriceRange,
    pub categories: BTreeSet<String>,
    pub ingredients: BTreeSet<String>,
}

impl CatalogFilter {
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub const fn with_price(mut self, price: PriceRange) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    #[must_use]
    pub fn with_ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredients.insert(ingredient.into());
        self
    }

    /// Number of active constraints, as shown on the filter badge.
    ///
    /// Search text is not counted; a narrowed price range counts once.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.categories.len() + self.ingredients.len() + usize::from(!self.price.is_unbounded())
    }

    /// Whether `product` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.price.contains(product.price)
            && self.matches_categories(product)
            && self.matches_ingredients(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }

    // A single selected category is an exact match on the product's whole
    // category set; several selected categories only need one overlap.
    fn matches_categories(&self, product: &Product) -> bool {
        let mut selected = self.categories.iter();
        match (selected.next(), selected.next()) {
            (None, _) => true,
            (Some(only), None) => matches!(product.categories.as_slice(), [c] if c == only),
            (Some(_), Some(_)) => self.categories.iter().any(|c| product.has_category(c)),
        }
    }

    fn matches_ingredients(&self, product: &Product) -> bool {
        self.ingredients.is_empty() || self.ingredients.iter().any(|i| product.has_ingredient(i))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, price: &str, categories: &[&str], ingredients: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Gâteau {id}"),
            description: format!("Une douceur {id}"),
            price: price.parse().unwrap(),
            image: format!("/static/images/{id}.jpg"),
            categories: categories.iter().map(ToString::to_string).collect(),
            ingredients: ingredients.iter().map(ToString::to_string).collect(),
            allergens: Vec::new(),
            gallery: Vec::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product("baklawa", "45", &["Traditionnelle", "Orientale"], &["Pistaches", "Miel"]),
            product("makroudh", "18", &["Traditionnelle"], &["Dattes", "Miel"]),
            product("tarte", "25", &["Moderne", "Fruits"], &[]),
            product("fondant", "30", &["Chocolat"], &["Chocolat"]),
        ])
        .unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let catalog = catalog();
        let result = catalog.filter(&CatalogFilter::default());
        assert_eq!(ids(&result), ["baklawa", "makroudh", "tarte", "fondant"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_or_description() {
        let catalog = catalog();
        let by_name = catalog.filter(&CatalogFilter::default().with_search("GÂTEAU TARTE"));
        assert_eq!(ids(&by_name), ["tarte"]);

        let by_description = catalog.filter(&CatalogFilter::default().with_search("douceur fond"));
        assert_eq!(ids(&by_description), ["fondant"]);

        let none = catalog.filter(&CatalogFilter::default().with_search("croissant"));
        assert!(none.is_empty());
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let catalog = catalog();
        let range = PriceRange::new(Some("18".parse().unwrap()), Some("30".parse().unwrap()));
        let result = catalog.filter(&CatalogFilter::default().with_price(range));
        assert_eq!(ids(&result), ["makroudh", "tarte", "fondant"]);

        let only_max = PriceRange::new(None, Some("20".parse().unwrap()));
        let result = catalog.filter(&CatalogFilter::default().with_price(only_max));
        assert_eq!(ids(&result), ["makroudh"]);
    }

    #[test]
    fn test_single_category_requires_exact_category_set() {
        let catalog = catalog();
        let result = catalog.filter(&CatalogFilter::default().with_category("Traditionnelle"));
        // baklawa is also Orientale, so it is excluded
        assert_eq!(ids(&result), ["makroudh"]);
    }

    #[test]
    fn test_multiple_categories_match_any_overlap() {
        let catalog = catalog();
        let filter = CatalogFilter::default()
            .with_category("Traditionnelle")
            .with_category("Fruits");
        let result = catalog.filter(&filter);
        assert_eq!(ids(&result), ["baklawa", "makroudh", "tarte"]);
    }

    #[test]
    fn test_ingredients_match_any_overlap() {
        let catalog = catalog();
        let filter = CatalogFilter::default()
            .with_ingredient("Miel")
            .with_ingredient("Chocolat");
        assert_eq!(ids(&catalog.filter(&filter)), ["baklawa", "makroudh", "fondant"]);

        let filter = CatalogFilter::default().with_ingredient("Amandes");
        assert!(catalog.filter(&filter).is_empty());
    }

    #[test]
    fn test_constraints_combine() {
        let catalog = catalog();
        let filter = CatalogFilter::default()
            .with_search("gâteau")
            .with_ingredient("Miel")
            .with_price(PriceRange::new(None, Some("40".parse().unwrap())));
        assert_eq!(ids(&catalog.filter(&filter)), ["makroudh"]);
    }

    #[test]
    fn test_active_count() {
        assert_eq!(CatalogFilter::default().active_count(), 0);
        let filter = CatalogFilter::default()
            .with_search("miel")
            .with_category("Moderne")
            .with_ingredient("Miel")
            .with_price(PriceRange::new(Some(Price::ZERO), None));
        assert_eq!(filter.active_count(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            product("baklawa", "1", &[], &[]),
            product("baklawa", "2", &[], &[]),
        ]);
        assert_eq!(
            result,
            Err(CatalogError::DuplicateId(ProductId::new("baklawa")))
        );
    }

    #[test]
    fn test_filter_option_lists() {
        let catalog = catalog();
        assert_eq!(
            catalog.categories(),
            ["Traditionnelle", "Moderne", "Orientale", "Chocolat", "Fruits"]
        );
        assert!(catalog.ingredients().contains(&"Fleur d'oranger"));
        assert_eq!(catalog.ingredients().len(), 6);
    }

    #[test]
    fn test_related_shares_a_category_and_excludes_self() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.related("makroudh", RELATED_LIMIT)), ["baklawa"]);
        assert_eq!(ids(&catalog.related("baklawa", 1)), ["makroudh"]);
        assert!(catalog.related("unknown", RELATED_LIMIT).is_empty());
    }

    #[test]
    fn test_get_and_price_ceiling() {
        let catalog = catalog();
        assert_eq!(catalog.get("tarte").unwrap().name, "Gâteau tarte");
        assert!(catalog.get("nope").is_none());
        assert_eq!(catalog.price_ceiling(), "45".parse().unwrap());
        assert_eq!(Catalog::default().price_ceiling(), Price::ZERO);
    }
}
