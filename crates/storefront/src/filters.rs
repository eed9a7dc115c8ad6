//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Percent-encodes a value for use in a query string.
///
/// Usage in templates: `{{ category|urlencode_component }}`
#[askama::filter_fn]
pub fn urlencode_component(
    value: impl Display,
    _env: &dyn askama::Values,
) -> askama::Result<String> {
    Ok(urlencoding::encode(&value.to_string()).into_owned())
}
