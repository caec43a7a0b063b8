//! HTTP route handlers for the marketplace site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (backend ping)
//!
//! # Search & browsing
//! GET  /search                  - Filtered property search
//! GET  /property-type/{listing_type}/{type_name} - Listings of one type
//! GET  /area/{name}             - Listings in one locality
//! GET  /property/{id}           - Property detail
//!
//! # Listings (requires auth)
//! GET  /my-properties           - Own listings and the post-a-property form
//! POST /my-properties           - Create a listing
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Registration page
//! POST /auth/register           - Registration action
//! POST /auth/logout             - Logout action
//!
//! # Deals (requires auth)
//! GET  /dashboard               - Role-dispatched landing
//! GET  /my-deals                - Role-dispatched deal list
//! GET  /buyer-deals             - Deals where the viewer is the buyer
//! GET  /seller-deals            - Deals on the viewer's listings
//! GET  /deals/{id}              - Deal detail
//! POST /deals/{id}/stage        - Stage update
//! POST /deals/{id}/seller-confirm   - Seller registration confirmation
//! POST /deals/{id}/complete-payment - Payment completion
//! POST /deals/{id}/document     - Buyer document upload
//!
//! # Agent (requires AGENT role)
//! GET  /agent-dashboard         - Stats, deals, properties, create-deal flow
//! POST /agent-dashboard/deals   - Create a deal
//!
//! # Admin (requires ADMIN role)
//! GET  /admin-deals             - All deals grouped by agent
//! GET  /admin-agents            - Agent roster with performance
//! GET  /admin-users             - User management
//! POST /admin-users/{id}/update - Edit a user
//! POST /admin-users/{id}/delete - Delete a user
//!
//! # Rental agreements (session-only)
//! GET  /rental-agreement        - Agreement generator
//! POST /rental-agreement        - Generate an agreement
//! GET  /my-agreements           - Generated agreements
//!
//! # Static pages
//! GET  /owner-plans             - Owner subscription plans
//! GET  /home-renovation         - Renovation services
//! ```

pub mod admin;
pub mod agent;
pub mod agreements;
pub mod auth;
pub mod deals;
pub mod home;
pub mod pages;
pub mod properties;
pub mod search;

use axum::{
    Router,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;

use crate::backend::BackendError;
use crate::state::AppState;

/// City every locality list is scoped to. The backend is seeded for one
/// metro; a city picker is deliberately out of scope until it isn't.
pub(crate) const DEFAULT_CITY: &str = "Hyderabad";

/// Query parameters carrying a post-redirect banner message.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect back to `path` with an error banner.
pub(crate) fn redirect_error(path: &str, message: &str) -> Response {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message))).into_response()
}

/// Redirect back to `path` with a success banner.
pub(crate) fn redirect_success(path: &str, message: &str) -> Response {
    Redirect::to(&format!("{path}?success={}", urlencoding::encode(message))).into_response()
}

/// User-facing text for a failed backend command.
pub(crate) fn user_message(error: &BackendError) -> String {
    match error {
        BackendError::Rejected(message) => message.clone(),
        BackendError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
        BackendError::RateLimited(_) => {
            "Too many requests. Please wait a moment and try again.".to_string()
        }
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Create the auth routes router.
///
/// The credential-handling POST routes sit behind the auth rate limiter;
/// the pages themselves are not limited.
pub fn auth_routes() -> Router<AppState> {
    let actions = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route_layer(crate::middleware::auth_rate_limiter());

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .merge(actions)
}

/// Create the deal detail and action routes router.
pub fn deal_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(deals::show))
        .route("/{id}/stage", post(deals::update_stage))
        .route("/{id}/seller-confirm", post(deals::seller_confirm))
        .route("/{id}/complete-payment", post(deals::complete_payment))
        .route("/{id}/document", post(deals::upload_document))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin-deals", get(admin::deals))
        .route("/admin-agents", get(admin::agents))
        .route("/admin-users", get(admin::users))
        .route("/admin-users/{id}/update", post(admin::update_user))
        .route("/admin-users/{id}/delete", post(admin::delete_user))
}

/// Create the rental agreement routes router.
pub fn agreement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rental-agreement",
            get(agreements::generator).post(agreements::generate),
        )
        .route("/my-agreements", get(agreements::my_agreements))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Search and browsing
        .route("/search", get(search::search))
        .route(
            "/property-type/{listing_type}/{type_name}",
            get(search::by_property_type),
        )
        .route("/area/{name}", get(search::by_area))
        .route("/property/{id}", get(properties::show))
        // Owner listings
        .route(
            "/my-properties",
            get(properties::my_properties).post(properties::create),
        )
        // Deal tracking
        .route("/dashboard", get(pages::dashboard))
        .route("/my-deals", get(deals::my_deals))
        .route("/buyer-deals", get(deals::buyer_deals))
        .route("/seller-deals", get(deals::seller_deals))
        .nest("/deals", deal_routes())
        // Agent dashboard
        .route("/agent-dashboard", get(agent::dashboard))
        .route("/agent-dashboard/deals", post(agent::create_deal))
        // Admin screens
        .merge(admin_routes())
        // Rental agreements
        .merge(agreement_routes())
        // Static pages
        .route("/owner-plans", get(pages::owner_plans))
        .route("/home-renovation", get(pages::home_renovation))
        // Auth routes
        .nest("/auth", auth_routes())
}
