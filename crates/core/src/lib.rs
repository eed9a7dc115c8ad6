//! Soltana Core - Storefront domain library.
//!
//! This crate provides the domain logic shared by the Soltana components:
//! - `storefront` - Public-facing pastry shop site
//! - `integration-tests` - End-to-end tests driving the storefront over HTTP
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no sessions. Cart and catalog state are plain owned values; whoever holds
//! them (a request handler, a test) mutates them directly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails and phones
//! - [`catalog`] - Products, the catalog and its filter predicate
//! - [`cart`] - The cart state container
//! - [`order`] - Customer details and order summaries built from a cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;

pub use cart::{Cart, CartItem, NewCartItem};
pub use catalog::{
    CATEGORIES, Catalog, CatalogError, CatalogFilter, INGREDIENTS, PriceRange, Product,
    RELATED_LIMIT,
};
pub use order::{Customer, CustomerError, OrderError, OrderLine, OrderSummary};
pub use types::*;
