//! Admin route handlers: all-deals oversight, agent roster, user management.
//!
//! The all-deals screen is assembled from the dashboard aggregate plus one
//! deals request per agent. Agent fetches run one at a time and a failed
//! agent is skipped with a warning, so one bad record degrades that section
//! instead of blanking the whole page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use estatehub_core::{DealStage, Phone, UserId, UserRole};

use crate::backend::types::{
    AdminDashboard, AgentPerformance, Deal, User, UserUpdateRequest,
};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::session::CurrentUser;
use crate::routes::{redirect_error, redirect_success, user_message};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// One agent's section on the all-deals screen.
pub struct AgentDealGroup {
    pub performance: AgentPerformance,
    pub deals: Vec<Deal>,
}

/// All-deals oversight template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/deals.html")]
pub struct AdminDealsTemplate {
    pub user: Option<CurrentUser>,
    pub dashboard: AdminDashboard,
    pub groups: Vec<AgentDealGroup>,
    /// Stage tab counts in canonical order.
    pub stage_tabs: Vec<(DealStage, i64)>,
    /// Selected stage tab, `all` when none.
    pub stage_filter: String,
}

/// One row of the agent roster.
pub struct AgentRosterEntry {
    pub agent: User,
    pub performance: Option<AgentPerformance>,
}

/// Agent roster template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/agents.html")]
pub struct AdminAgentsTemplate {
    pub user: Option<CurrentUser>,
    pub roster: Vec<AgentRosterEntry>,
}

/// User management template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct AdminUsersTemplate {
    pub user: Option<CurrentUser>,
    pub users: Vec<User>,
    /// Role counts for the filter tabs, in display order.
    pub role_tabs: Vec<(UserRole, usize)>,
    /// Selected role tab, `all` when none.
    pub role_filter: String,
    /// User whose row is in edit mode.
    pub editing: Option<UserId>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Query parameters for the all-deals screen.
#[derive(Debug, Deserialize)]
pub struct AdminDealsQuery {
    /// Stage name to filter by.
    pub stage: Option<String>,
}

/// Query parameters for the user management screen.
#[derive(Debug, Deserialize)]
pub struct AdminUsersQuery {
    pub role: Option<String>,
    /// User to open in edit mode.
    pub edit: Option<UserId>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// User edit form submission.
#[derive(Debug, Deserialize)]
pub struct UserEditForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub role: String,
    pub address: String,
}

// =============================================================================
// Deals Oversight
// =============================================================================

/// All deals in the system, grouped by managing agent.
#[instrument(skip(state, user))]
pub async fn deals(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(query): Query<AdminDealsQuery>,
) -> Response {
    let backend = state.backend();

    let dashboard = backend.admin_dashboard(&user.token).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch admin dashboard: {e}");
            AdminDashboard::default()
        },
        |dashboard| dashboard,
    );

    // One request per agent; a failing agent drops out of the page rather
    // than failing it.
    let mut groups = Vec::with_capacity(dashboard.agent_performance.len());
    for performance in &dashboard.agent_performance {
        match backend
            .admin_agent_deals(performance.agent_id, &user.token)
            .await
        {
            Ok(deals) => groups.push(AgentDealGroup {
                performance: performance.clone(),
                deals,
            }),
            Err(e) => {
                tracing::warn!(
                    "Skipping agent {} on the all-deals screen: {e}",
                    performance.agent_id
                );
            }
        }
    }

    let stage_filter = query
        .stage
        .filter(|raw| DealStage::parse(raw).is_some())
        .unwrap_or_else(|| "all".to_string());

    if stage_filter != "all" {
        for group in &mut groups {
            group.deals.retain(|deal| deal.stage_raw() == stage_filter);
        }
        groups.retain(|group| !group.deals.is_empty());
    }

    let stage_tabs = dashboard.stage_counts();

    AdminDealsTemplate {
        user: Some(user),
        dashboard,
        groups,
        stage_tabs,
        stage_filter,
    }
    .into_response()
}

// =============================================================================
// Agent Roster
// =============================================================================

/// Agent roster with per-agent performance.
#[instrument(skip(state, user))]
pub async fn agents(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> Response {
    let backend = state.backend();

    let roster_users = backend.agents(&user.token).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch agent roster: {e}");
            Vec::new()
        },
        |agents| agents,
    );

    let mut performance = backend.agents_performance(&user.token).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch agent performance: {e}");
            Vec::new()
        },
        |performance| performance,
    );

    let roster = roster_users
        .into_iter()
        .map(|agent| {
            let position = performance.iter().position(|p| p.agent_id == agent.id);
            let matched = position.map(|i| performance.swap_remove(i));
            AgentRosterEntry {
                agent,
                performance: matched,
            }
        })
        .collect();

    AdminAgentsTemplate {
        user: Some(user),
        roster,
    }
    .into_response()
}

// =============================================================================
// User Management
// =============================================================================

const ROLE_TAB_ORDER: [UserRole; 4] = [
    UserRole::Buyer,
    UserRole::Seller,
    UserRole::Agent,
    UserRole::Admin,
];

/// User management screen with role filter tabs and inline editing.
#[instrument(skip(state, user))]
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(query): Query<AdminUsersQuery>,
) -> Response {
    let all_users = state.backend().users(&user.token).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch users: {e}");
            Vec::new()
        },
        |users| users,
    );

    let role_tabs = ROLE_TAB_ORDER
        .iter()
        .map(|&role| {
            let count = all_users.iter().filter(|u| u.role == role).count();
            (role, count)
        })
        .collect();

    let role_filter = query
        .role
        .filter(|raw| raw.parse::<UserRole>().is_ok())
        .unwrap_or_else(|| "all".to_string());

    let users = match role_filter.parse::<UserRole>() {
        Ok(role) => all_users.into_iter().filter(|u| u.role == role).collect(),
        Err(_) => all_users,
    };

    AdminUsersTemplate {
        user: Some(user),
        users,
        role_tabs,
        role_filter,
        editing: query.edit,
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle the inline user edit form.
#[instrument(skip(state, user, form))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(user_id): Path<UserId>,
    Form(form): Form<UserEditForm>,
) -> Response {
    if form.email.trim().is_empty() {
        return redirect_error("/admin-users", "Email cannot be empty.");
    }

    let mobile_number = match form.mobile.trim() {
        "" => None,
        raw => match Phone::parse(raw) {
            Ok(phone) => Some(phone.into_inner()),
            Err(_) => {
                return redirect_error(
                    "/admin-users",
                    "Please enter a valid 10-digit mobile number.",
                );
            }
        },
    };

    let Ok(role) = form.role.trim().parse::<UserRole>() else {
        return redirect_error("/admin-users", "Please choose a valid role.");
    };

    let request = UserUpdateRequest {
        first_name: Some(form.first_name.trim().to_string()),
        last_name: Some(form.last_name.trim().to_string()),
        email: Some(form.email.trim().to_string()),
        mobile_number,
        role: Some(role),
        address: Some(form.address.trim().to_string()),
    };

    match state
        .backend()
        .update_user(user_id, &request, &user.token)
        .await
    {
        Ok(()) => {
            tracing::info!("User {user_id} updated by {}", user.username);
            redirect_success("/admin-users", "User updated.")
        }
        Err(e) => {
            tracing::warn!("User update failed for {user_id}: {e}");
            redirect_error("/admin-users", &user_message(&e))
        }
    }
}

/// Handle user deletion.
#[instrument(skip(state, user))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(user_id): Path<UserId>,
) -> Response {
    if user_id == user.id {
        return redirect_error("/admin-users", "You cannot delete your own account.");
    }

    match state.backend().delete_user(user_id, &user.token).await {
        Ok(()) => {
            tracing::info!("User {user_id} deleted by {}", user.username);
            redirect_success("/admin-users", "User deleted.")
        }
        Err(e) => {
            tracing::warn!("User deletion failed for {user_id}: {e}");
            redirect_error("/admin-users", &user_message(&e))
        }
    }
}
