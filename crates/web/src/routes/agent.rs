//! Agent dashboard route handlers.
//!
//! One screen for the agent's whole working day: portfolio stat cards, tabbed
//! lists of deals and managed properties, and the start-a-deal flow. Deal
//! creation begins with a buyer lookup by mobile number; the create form only
//! appears once the lookup has resolved to an account.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use estatehub_core::{Phone, PropertyId, UserId};

use crate::backend::types::{AgentStats, CreateDealRequest, Deal, Property, User};
use crate::filters;
use crate::middleware::RequireAgent;
use crate::models::session::CurrentUser;
use crate::routes::{redirect_error, redirect_success, user_message};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Agent dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "agent/dashboard.html")]
pub struct AgentDashboardTemplate {
    pub user: Option<CurrentUser>,
    pub stats: AgentStats,
    pub deals: Vec<Deal>,
    pub properties: Vec<Property>,
    /// Active tab: `active`, `completed`, `properties`, or `total`.
    pub tab: String,
    pub active_count: usize,
    pub completed_count: usize,
    /// Buyer resolved from the phone lookup, if any.
    pub buyer: Option<User>,
    /// The number as typed, echoed back into the lookup box.
    pub phone: Option<String>,
    pub lookup_error: Option<String>,
    /// Listing preselected in the create form (arriving from a property page).
    pub selected_property: Option<Property>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Query parameters for the agent dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
    /// Buyer lookup number.
    pub phone: Option<String>,
    /// Listing to preselect in the create form.
    pub property: Option<PropertyId>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Create-deal form submission.
///
/// Selects post empty strings when nothing is chosen, so the IDs arrive as
/// text and are parsed here.
#[derive(Debug, Deserialize)]
pub struct CreateDealForm {
    pub property_id: String,
    pub buyer_id: String,
    pub agreed_price: String,
    pub notes: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Agent dashboard: stats, deals, managed properties, and the create-deal
/// flow.
#[instrument(skip(state, user))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAgent(user): RequireAgent,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let backend = state.backend();

    let deals = backend.deals_by_agent(user.id, &user.token).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch deals for agent {}: {e}", user.id);
            Vec::new()
        },
        |deals| deals,
    );

    let properties = backend
        .agent_properties(user.id, &user.token)
        .await
        .map_or_else(
            |e| {
                tracing::error!("Failed to fetch properties for agent {}: {e}", user.id);
                Vec::new()
            },
            |properties| properties,
        );

    let stats = backend.agent_stats(user.id, &user.token).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch stats for agent {}: {e}", user.id);
            AgentStats::default()
        },
        |stats| stats,
    );

    // An empty lookup box submits `phone=`; treat that as no lookup at all.
    let (buyer, lookup_error) = match query.phone.as_deref().map(str::trim) {
        Some(phone) if !phone.is_empty() => lookup_buyer(&state, &user, phone).await,
        _ => (None, None),
    };

    let selected_property = query
        .property
        .and_then(|id| properties.iter().find(|p| p.id == id).cloned());

    let active_count = deals.iter().filter(|deal| deal.is_active()).count();
    let completed_count = deals.len() - active_count;

    AgentDashboardTemplate {
        user: Some(user),
        stats,
        deals,
        properties,
        tab: query.tab.unwrap_or_else(|| "active".to_string()),
        active_count,
        completed_count,
        buyer,
        phone: query.phone,
        lookup_error,
        selected_property,
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Resolve a buyer account from a mobile number.
///
/// The number must be a valid 10-digit mobile before any request is made.
async fn lookup_buyer(
    state: &AppState,
    user: &CurrentUser,
    phone: &str,
) -> (Option<User>, Option<String>) {
    let Ok(parsed) = Phone::parse(phone) else {
        return (
            None,
            Some("Please enter a valid 10-digit mobile number.".to_string()),
        );
    };

    match state
        .backend()
        .search_user_by_phone(parsed.as_str(), &user.token)
        .await
    {
        Ok(Some(buyer)) => (Some(buyer), None),
        Ok(None) => (
            None,
            Some(format!("No user found with the number {parsed}.")),
        ),
        Err(e) => {
            tracing::error!("Buyer lookup failed for {parsed}: {e}");
            (
                None,
                Some("Could not look up that number. Please try again.".to_string()),
            )
        }
    }
}

/// Handle the create-deal form.
#[instrument(skip(state, user, form))]
pub async fn create_deal(
    State(state): State<AppState>,
    RequireAgent(user): RequireAgent,
    Form(form): Form<CreateDealForm>,
) -> Response {
    let (Ok(property_id), Ok(buyer_id)) = (
        form.property_id.trim().parse::<i64>(),
        form.buyer_id.trim().parse::<i64>(),
    ) else {
        return redirect_error(
            "/agent-dashboard",
            "Please select both a property and a buyer.",
        );
    };

    let agreed_price = match form.agreed_price.trim() {
        "" => None,
        raw => match raw.parse::<Decimal>() {
            Ok(price) if price > Decimal::ZERO => Some(price),
            _ => {
                return redirect_error("/agent-dashboard", "Please enter a valid agreed price.");
            }
        },
    };

    let request = CreateDealRequest {
        property_id: PropertyId::new(property_id),
        buyer_id: UserId::new(buyer_id),
        agent_id: user.id,
        agreed_price,
        notes: form.notes.trim().to_string(),
    };

    match state.backend().create_deal(&request, &user.token).await {
        Ok(()) => {
            tracing::info!(
                "Deal created on property {} for buyer {} by {}",
                request.property_id,
                request.buyer_id,
                user.username
            );
            redirect_success("/agent-dashboard", "Deal created successfully!")
        }
        Err(e) => {
            tracing::warn!("Deal creation failed: {e}");
            redirect_error("/agent-dashboard", &user_message(&e))
        }
    }
}
