//! Visitor state kept between requests.

pub mod session;

pub use session::{Favorites, keys as session_keys};
