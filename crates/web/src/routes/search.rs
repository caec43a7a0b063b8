//! Property search and filtered listing pages.
//!
//! `/search` maps query parameters onto the backend search call; the
//! `/property-type/{listing_type}/{property_type}` and `/area/{area_name}`
//! pages are canned searches with a derived heading.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use crate::backend::types::{Property, PropertySearchRequest};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::session::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Search filters as they appear in the URL.
///
/// Parameter names stay camelCase so header links and the search form share
/// one vocabulary with the backend payload. Every field goes through
/// [`empty_as_none`]: the filter form submits untouched inputs as empty
/// strings, which must read as "no filter" rather than a parse error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub listing_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_bedrooms: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_bedrooms: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub is_verified: Option<bool>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub owner_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub is_ready_to_move: Option<bool>,
}

/// Deserialize an optional query value, reading an empty or blank string as
/// `None` instead of failing the parse.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl SearchQuery {
    /// Backend search payload for these filters.
    fn to_request(&self) -> PropertySearchRequest {
        PropertySearchRequest {
            property_type: self.property_type.clone(),
            listing_type: self.listing_type.clone(),
            city: self.city.clone(),
            area: self.area.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_bedrooms,
            max_bedrooms: self.max_bedrooms,
            is_verified: self.is_verified,
            owner_type: self.owner_type.clone(),
            is_ready_to_move: self.is_ready_to_move,
            ..PropertySearchRequest::new()
        }
    }

    /// Page heading derived from the active filters.
    fn heading(&self) -> String {
        let listing = self.listing_type.as_deref().map(listing_label);
        match (self.property_type.as_deref(), listing) {
            (Some(kind), Some(listing)) => format!("{kind}s for {listing}"),
            (None, Some(listing)) => format!("Properties for {listing}"),
            _ => self
                .area
                .as_deref()
                .map_or_else(|| "Search Results".to_string(), |area| {
                    format!("Properties in {area}")
                }),
        }
    }
}

fn listing_label(listing_type: &str) -> &'static str {
    if listing_type.eq_ignore_ascii_case("rent") {
        "Rent"
    } else {
        "Sale"
    }
}

/// `jubilee-hills` -> `Jubilee Hills`.
fn title_case(slug: &str) -> String {
    slug.split(['-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Template
// =============================================================================

/// Search results page template, shared by all filtered listing pages.
#[derive(Template, WebTemplate)]
#[template(path = "search_results.html")]
pub struct SearchResultsTemplate {
    pub user: Option<CurrentUser>,
    pub heading: String,
    pub properties: Vec<Property>,
}

async fn run_search(state: &AppState, request: &PropertySearchRequest) -> Vec<Property> {
    state
        .backend()
        .search_properties(request)
        .await
        .map_or_else(
            |e| {
                tracing::error!("Property search failed: {e}");
                Vec::new()
            },
            |properties| properties,
        )
}

// =============================================================================
// Handlers
// =============================================================================

/// Display search results for the query-string filters.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let properties = run_search(&state, &query.to_request()).await;

    SearchResultsTemplate {
        user,
        heading: query.heading(),
        properties,
    }
}

/// Canned search for one property type, e.g. `/property-type/sale/Villa`.
#[instrument(skip(state))]
pub async fn by_property_type(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path((listing_type, property_type)): Path<(String, String)>,
) -> impl IntoResponse {
    let query = SearchQuery {
        listing_type: Some(listing_type),
        property_type: Some(property_type),
        ..SearchQuery::default()
    };
    let properties = run_search(&state, &query.to_request()).await;

    SearchResultsTemplate {
        user,
        heading: query.heading(),
        properties,
    }
}

/// Canned search for one locality, e.g. `/area/jubilee-hills`.
#[instrument(skip(state))]
pub async fn by_area(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(area_name): Path<String>,
) -> impl IntoResponse {
    let area = title_case(&area_name);
    let query = SearchQuery {
        area: Some(area.clone()),
        ..SearchQuery::default()
    };
    let properties = run_search(&state, &query.to_request()).await;

    SearchResultsTemplate {
        user,
        heading: format!("Properties in {area}"),
        properties,
    }
}
