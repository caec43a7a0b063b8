//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use estatehub_core::types::format_inr;
use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Formats a decimal amount as rupees with Indian digit grouping.
///
/// Usage in templates: `{{ agreement.monthly_rent|inr }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn inr(amount: &Decimal, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_inr(*amount))
}

/// Formats a calendar date as `12 Mar 2024`.
///
/// Usage in templates: `{{ agreement.start_date|date }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn date(value: &NaiveDate, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.format("%d %b %Y").to_string())
}

/// Formats a timestamp as its `12 Mar 2024` date.
///
/// Backend timestamps carry a time component, but the site only ever
/// shows the day.
///
/// Usage in templates: `{{ event.date|datetime }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn datetime(value: &NaiveDateTime, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.format("%d %b %Y").to_string())
}
