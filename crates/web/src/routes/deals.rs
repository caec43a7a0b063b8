//! Deal tracking route handlers.
//!
//! `/my-deals` is the shared entry point: what it shows depends on who is
//! asking. Buyers see deals where they are the buyer, sellers see deals on
//! their own listings, agents see the portfolio they manage, and admins see
//! every deal in the system grouped by stage. The detail screen resolves a
//! role-capability table against the deal's state to decide which tabs and
//! actions to render.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::instrument;

use estatehub_core::{DealId, DealStage, UserId, UserRole};

use crate::backend::types::{Deal, StageUpdateRequest, TimelineEntry};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::capabilities::DealCapabilities;
use crate::models::session::CurrentUser;
use crate::routes::{MessageQuery, redirect_error, redirect_success, user_message};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Deals grouped under one stage, for the admin all-deals view.
pub struct StageGroup {
    pub stage: DealStage,
    pub deals: Vec<Deal>,
}

/// Deal list template, shared by every role's list screen.
///
/// Exactly one of `deals` / `groups` is populated: flat lists for buyers,
/// sellers and agents, stage groups for the admin overview.
#[derive(Template, WebTemplate)]
#[template(path = "deals/list.html")]
pub struct DealListTemplate {
    pub user: Option<CurrentUser>,
    pub heading: String,
    pub deals: Vec<Deal>,
    pub groups: Vec<StageGroup>,
    /// Active list filter: `all`, `active`, or `completed`.
    pub filter: String,
    /// Base path the filter tabs link back to.
    pub filter_path: &'static str,
}

/// Deal detail template.
#[derive(Template, WebTemplate)]
#[template(path = "deals/show.html")]
pub struct DealDetailTemplate {
    pub user: Option<CurrentUser>,
    pub deal: Deal,
    pub caps: DealCapabilities,
    pub timeline: Vec<TimelineEntry>,
    /// Default date for the stage-update form.
    pub today: NaiveDate,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Query parameters for the deal list screens.
#[derive(Debug, Deserialize)]
pub struct DealListQuery {
    /// `all` (default), `active`, or `completed`.
    pub filter: Option<String>,
    /// Admin drill-down into one agent's deals.
    pub agent: Option<UserId>,
}

/// Stage-update form submission.
#[derive(Debug, Deserialize)]
pub struct StageUpdateForm {
    pub stage: String,
    pub notes: String,
    pub date: String,
}

// =============================================================================
// List Handlers
// =============================================================================

/// Role-dispatched deal list.
#[instrument(skip(state, user))]
pub async fn my_deals(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<DealListQuery>,
) -> Response {
    let filter = query.filter.unwrap_or_else(|| "all".to_string());
    let backend = state.backend();

    match user.role {
        UserRole::Buyer => {
            let deals = fetch_or_empty(backend.deals_by_buyer(user.id, &user.token).await);
            render_list(user, "My Deals".to_string(), deals, filter)
        }
        UserRole::Seller => {
            let deals =
                fetch_or_empty(backend.my_deals(UserRole::Seller, user.id, &user.token).await);
            render_list(user, "My Property Deals".to_string(), deals, filter)
        }
        UserRole::Agent => {
            let deals = fetch_or_empty(backend.deals_by_agent(user.id, &user.token).await);
            render_list(user, "Deal Management Dashboard".to_string(), deals, filter)
        }
        UserRole::Admin => match query.agent {
            Some(agent_id) => {
                let deals = fetch_or_empty(backend.admin_agent_deals(agent_id, &user.token).await);
                let heading = deals
                    .first()
                    .and_then(|deal| deal.agent_name.clone())
                    .map_or_else(
                        || "Agent Deals".to_string(),
                        |name| format!("Deals by {name}"),
                    );
                render_list(user, heading, deals, filter)
            }
            None => {
                let groups = backend
                    .all_deals_by_stage(&user.token)
                    .await
                    .into_iter()
                    .map(|(stage, deals)| StageGroup { stage, deals })
                    .collect();
                DealListTemplate {
                    user: Some(user),
                    heading: "All Deals (Admin)".to_string(),
                    deals: Vec::new(),
                    groups,
                    filter,
                    filter_path: "/my-deals",
                }
                .into_response()
            }
        },
    }
}

/// Deals where the signed-in user is the buyer.
#[instrument(skip(state, user))]
pub async fn buyer_deals(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<DealListQuery>,
) -> Response {
    let filter = query.filter.unwrap_or_else(|| "all".to_string());
    let deals = fetch_or_empty(state.backend().deals_by_buyer(user.id, &user.token).await);

    DealListTemplate {
        user: Some(user),
        heading: "My Deals".to_string(),
        deals: apply_filter(deals, &filter),
        groups: Vec::new(),
        filter,
        filter_path: "/buyer-deals",
    }
    .into_response()
}

/// Deals on properties the signed-in user has listed.
#[instrument(skip(state, user))]
pub async fn seller_deals(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<DealListQuery>,
) -> Response {
    let filter = query.filter.unwrap_or_else(|| "all".to_string());
    let deals = fetch_or_empty(
        state
            .backend()
            .my_deals(UserRole::Seller, user.id, &user.token)
            .await,
    );

    DealListTemplate {
        user: Some(user),
        heading: "My Property Deals".to_string(),
        deals: apply_filter(deals, &filter),
        groups: Vec::new(),
        filter,
        filter_path: "/seller-deals",
    }
    .into_response()
}

fn render_list(user: CurrentUser, heading: String, deals: Vec<Deal>, filter: String) -> Response {
    DealListTemplate {
        user: Some(user),
        heading,
        deals: apply_filter(deals, &filter),
        groups: Vec::new(),
        filter,
        filter_path: "/my-deals",
    }
    .into_response()
}

fn fetch_or_empty(result: std::result::Result<Vec<Deal>, crate::backend::BackendError>) -> Vec<Deal> {
    result.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch deals: {e}");
        Vec::new()
    })
}

fn apply_filter(deals: Vec<Deal>, filter: &str) -> Vec<Deal> {
    match filter {
        "active" => deals.into_iter().filter(Deal::is_active).collect(),
        "completed" => deals.into_iter().filter(|deal| !deal.is_active()).collect(),
        _ => deals,
    }
}

// =============================================================================
// Detail Handler
// =============================================================================

/// Deal detail screen with role-dependent tabs and actions.
///
/// There is no single-deal endpoint; the deal is picked out of the viewer's
/// own deal list, which also guarantees they are a party to it.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<DealId>,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let deal = load_deal(&state, &user, deal_id).await?;
    let caps = DealCapabilities::for_deal(user.role, &deal);
    let timeline = deal.timeline();

    Ok(DealDetailTemplate {
        user: Some(user),
        deal,
        caps,
        timeline,
        today: Utc::now().date_naive(),
        error: query.error,
        success: query.success,
    }
    .into_response())
}

async fn load_deal(state: &AppState, user: &CurrentUser, deal_id: DealId) -> Result<Deal> {
    let deals = state
        .backend()
        .my_deals(user.role, user.id, &user.token)
        .await?;
    deals
        .into_iter()
        .find(|deal| deal.deal_id == deal_id)
        .ok_or_else(|| AppError::NotFound(format!("deal {deal_id}")))
}

// =============================================================================
// Action Handlers
// =============================================================================

/// Handle the stage-update form.
///
/// Notes and the visit date are checked here, before anything goes over the
/// wire; a submission missing either never reaches the backend.
#[instrument(skip(state, user, form))]
pub async fn update_stage(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<DealId>,
    Form(form): Form<StageUpdateForm>,
) -> Result<Response> {
    let deal = load_deal(&state, &user, deal_id).await?;
    let back = format!("/deals/{deal_id}");

    if !DealCapabilities::for_deal(user.role, &deal).edit_stage {
        return Ok(redirect_error(&back, "You cannot update this deal's stage."));
    }

    let request = match parse_stage_form(&form) {
        Ok(request) => request,
        Err(message) => return Ok(redirect_error(&back, message)),
    };

    match state
        .backend()
        .update_stage(deal_id, &request, &user.token)
        .await
    {
        Ok(_) => {
            tracing::info!(
                "Deal {deal_id} moved to {} by {}",
                request.stage,
                user.username
            );
            Ok(redirect_success(
                &back,
                &format!("Deal updated to {}.", request.stage),
            ))
        }
        Err(e) => {
            tracing::warn!("Stage update failed for deal {deal_id}: {e}");
            Ok(redirect_error(&back, &user_message(&e)))
        }
    }
}

/// Seller confirmation at the REGISTRATION stage.
#[instrument(skip(state, user))]
pub async fn seller_confirm(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<DealId>,
) -> Result<Response> {
    let deal = load_deal(&state, &user, deal_id).await?;
    let back = format!("/deals/{deal_id}");

    if !DealCapabilities::for_deal(user.role, &deal).confirm_registration {
        return Ok(redirect_error(
            &back,
            "Registration confirmation is not available for this deal.",
        ));
    }

    match state.backend().seller_confirm(deal_id, &user.token).await {
        Ok(()) => Ok(redirect_success(
            &back,
            "Registration confirmed. Your agent will take it from here.",
        )),
        Err(e) => {
            tracing::warn!("Seller confirmation failed for deal {deal_id}: {e}");
            Ok(redirect_error(&back, &user_message(&e)))
        }
    }
}

/// Agent payment completion at the PAYMENT stage.
#[instrument(skip(state, user))]
pub async fn complete_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<DealId>,
) -> Result<Response> {
    let deal = load_deal(&state, &user, deal_id).await?;
    let back = format!("/deals/{deal_id}");

    if !DealCapabilities::for_deal(user.role, &deal).complete_payment {
        return Ok(redirect_error(
            &back,
            "Payment completion is not available for this deal.",
        ));
    }

    match state.backend().complete_payment(deal_id, &user.token).await {
        Ok(()) => Ok(redirect_success(&back, "Payment marked as completed.")),
        Err(e) => {
            tracing::warn!("Payment completion failed for deal {deal_id}: {e}");
            Ok(redirect_error(&back, &user_message(&e)))
        }
    }
}

/// Buyer document upload.
///
/// The file goes to the asset host when one is configured; otherwise the
/// backend is sent a generated placeholder URL so the workflow flag still
/// flips.
#[instrument(skip(state, user, multipart))]
pub async fn upload_document(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<DealId>,
    mut multipart: Multipart,
) -> Result<Response> {
    let deal = load_deal(&state, &user, deal_id).await?;
    let back = format!("/deals/{deal_id}");

    if !DealCapabilities::for_deal(user.role, &deal).upload_document {
        return Ok(redirect_error(
            &back,
            "Document upload is not available for this deal.",
        ));
    }

    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("document") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/pdf")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;
        if !bytes.is_empty() {
            file = Some((file_name, content_type, bytes.to_vec()));
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return Ok(redirect_error(&back, "Please choose a document to upload."));
    };

    let doc_url = match state.assets() {
        Some(assets) => match assets.upload(&file_name, &content_type, bytes).await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Document upload failed for deal {deal_id}: {e}");
                return Ok(redirect_error(
                    &back,
                    "Could not upload the document. Please try again.",
                ));
            }
        },
        None => placeholder_doc_url(deal_id),
    };

    match state
        .backend()
        .upload_document(deal_id, &doc_url, &user.token)
        .await
    {
        Ok(()) => Ok(redirect_success(&back, "Document uploaded.")),
        Err(e) => {
            tracing::warn!("Document registration failed for deal {deal_id}: {e}");
            Ok(redirect_error(&back, &user_message(&e)))
        }
    }
}

fn placeholder_doc_url(deal_id: DealId) -> String {
    format!(
        "https://s3.amazonaws.com/deals/doc_{deal_id}_{}.pdf",
        Utc::now().timestamp_millis()
    )
}

/// Checks a stage-update form before anything is sent to the backend.
///
/// Notes and date are both required. The stage must be one of the seven
/// canonical values and the date must parse as `YYYY-MM-DD`.
fn parse_stage_form(
    form: &StageUpdateForm,
) -> std::result::Result<StageUpdateRequest, &'static str> {
    if form.notes.trim().is_empty() || form.date.trim().is_empty() {
        return Err("Please fill in both notes and date before updating the stage.");
    }
    let Some(stage) = DealStage::parse(form.stage.trim()) else {
        return Err("Please choose a valid stage.");
    };
    let Ok(date) = form.date.trim().parse::<NaiveDate>() else {
        return Err("Please enter the date as YYYY-MM-DD.");
    };
    Ok(StageUpdateRequest {
        stage,
        notes: form.notes.trim().to_string(),
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deal(id: i64, stage: &str) -> Deal {
        serde_json::from_value(json!({ "dealId": id, "stage": stage }))
            .expect("test deal should decode")
    }

    #[test]
    fn test_filter_active_drops_completed_deals() {
        let deals = vec![deal(1, "INQUIRY"), deal(2, "COMPLETED"), deal(3, "PAYMENT")];
        let active = apply_filter(deals, "active");
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(Deal::is_active));
    }

    #[test]
    fn test_filter_completed_keeps_only_completed() {
        let deals = vec![deal(1, "INQUIRY"), deal(2, "COMPLETED")];
        let completed = apply_filter(deals, "completed");
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].deal_id, DealId::new(2));
    }

    #[test]
    fn test_unknown_filter_keeps_everything() {
        let deals = vec![deal(1, "INQUIRY"), deal(2, "COMPLETED")];
        assert_eq!(apply_filter(deals, "everything").len(), 2);
    }

    #[test]
    fn test_placeholder_doc_url_shape() {
        let url = placeholder_doc_url(DealId::new(42));
        assert!(url.starts_with("https://s3.amazonaws.com/deals/doc_42_"));
        assert!(url.ends_with(".pdf"));
    }

    fn stage_form(stage: &str, notes: &str, date: &str) -> StageUpdateForm {
        StageUpdateForm {
            stage: stage.to_string(),
            notes: notes.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_stage_form_requires_notes_and_date() {
        assert!(parse_stage_form(&stage_form("AGREEMENT", "", "2026-03-01")).is_err());
        assert!(parse_stage_form(&stage_form("AGREEMENT", "   ", "2026-03-01")).is_err());
        assert!(parse_stage_form(&stage_form("AGREEMENT", "Signed at registrar", "")).is_err());
    }

    #[test]
    fn test_stage_form_rejects_unknown_stage_and_bad_date() {
        assert!(parse_stage_form(&stage_form("ESCROW", "notes", "2026-03-01")).is_err());
        assert!(parse_stage_form(&stage_form("AGREEMENT", "notes", "03/01/2026")).is_err());
    }

    #[test]
    fn test_stage_form_trims_and_parses() {
        let request = parse_stage_form(&stage_form(" PAYMENT ", "  Token received  ", "2026-03-01"))
            .expect("valid form should parse");
        assert_eq!(request.stage, DealStage::Payment);
        assert_eq!(request.notes, "Token received");
        assert_eq!(request.date.to_string(), "2026-03-01");
    }
}
