//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::backend::types::{AreaInfo, Property, PropertyTypeInfo};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::session::CurrentUser;
use crate::routes::DEFAULT_CITY;
use crate::state::AppState;

// =============================================================================
// Popular Areas (static content for the locality shortcuts)
// =============================================================================

/// One locality shortcut under the hero.
#[derive(Clone)]
pub struct PopularArea {
    pub name: String,
    pub emoji: &'static str,
}

/// Hyderabad localities pinned on the home page.
fn popular_areas() -> Vec<PopularArea> {
    [
        ("Gachibowli", "🏢"),
        ("HITEC City", "🏢"),
        ("Madhapur", "🌆"),
        ("Kondapur", "🏙️"),
        ("Kukatpally", "🏘️"),
        ("Miyapur", "🌇"),
        ("Jubilee Hills", "🛒"),
    ]
    .into_iter()
    .map(|(name, emoji)| PopularArea {
        name: name.to_string(),
        emoji,
    })
    .collect()
}

// =============================================================================
// Template
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    /// Featured listings for the main grid.
    pub properties: Vec<Property>,
    /// Locality shortcuts linking to `/area/{name}`.
    pub popular_areas: Vec<PopularArea>,
    /// Property categories for the search form select.
    pub property_types: Vec<PropertyTypeInfo>,
    /// Localities for the search form select.
    pub localities: Vec<AreaInfo>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    // Featured listings; an unreachable backend renders an empty grid.
    let properties = state.backend().featured_properties().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured properties: {e}");
            Vec::new()
        },
        |properties| properties.as_ref().clone(),
    );

    // Reference data for the search form selects.
    let property_types = state.backend().property_types().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch property types: {e}");
            Vec::new()
        },
        |types| types.as_ref().clone(),
    );

    let localities = state.backend().areas(DEFAULT_CITY).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch areas for {DEFAULT_CITY}: {e}");
            Vec::new()
        },
        |areas| areas.as_ref().clone(),
    );

    HomeTemplate {
        user,
        properties,
        popular_areas: popular_areas(),
        property_types,
        localities,
    }
}
