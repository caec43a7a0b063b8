//! Domain types for the marketplace backend API.
//!
//! The backend serializes Java-style camelCase JSON; every struct here carries
//! `rename_all = "camelCase"`. Some endpoints return mapped DTOs and others
//! return raw entities for the same resource, so fields carry aliases where
//! the two shapes disagree (e.g. `id` vs `propertyId`).

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use estatehub_core::{
    AreaId, DealId, DealStage, Price, PropertyId, PropertyTypeId, UserId, UserRole,
};

// =============================================================================
// User Types
// =============================================================================

/// A marketplace user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend user ID.
    pub id: UserId,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub mobile_number: Option<String>,
    /// Marketplace role.
    pub role: UserRole,
    /// Deactivated accounts cannot log in.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Account creation timestamp.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    /// Human-readable name, falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self
                .username
                .clone()
                .unwrap_or_else(|| format!("User #{}", self.id)),
        }
    }
}

/// Slim owner record nested inside property responses.
///
/// Deliberately untyped on role: owner blobs sometimes omit it, and a bad
/// owner record must not drop the whole property from a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOwner {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

impl PropertyOwner {
    /// Human-readable name, if any name fields are present.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.to_string()),
            (None, Some(last)) => Some(last.to_string()),
            (None, None) => None,
        }
    }
}

// =============================================================================
// Reference Data Types
// =============================================================================

/// A city served by the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInfo {
    #[serde(default, alias = "cityId")]
    pub id: Option<i64>,
    #[serde(default, alias = "cityName")]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// A locality within a city.
///
/// The list endpoint returns a flat DTO with `cityName`; entities nest a
/// city object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaInfo {
    #[serde(default, alias = "areaId")]
    pub id: Option<AreaId>,
    #[serde(default, alias = "areaName")]
    pub name: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub city: Option<CityInfo>,
}

impl AreaInfo {
    /// City name from whichever shape the response used.
    #[must_use]
    pub fn city_display(&self) -> Option<&str> {
        self.city_name
            .as_deref()
            .or_else(|| self.city.as_ref().and_then(|c| c.name.as_deref()))
    }
}

/// A property category (Flat, Villa, Plot, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTypeInfo {
    #[serde(default, alias = "propertyTypeId")]
    pub id: Option<PropertyTypeId>,
    #[serde(default, alias = "typeName")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Property type as it appears in responses: a bare name string on mapped
/// DTOs, a full object on raw entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyTypeRef {
    Name(String),
    Info(PropertyTypeInfo),
}

impl PropertyTypeRef {
    /// The type name regardless of representation.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Info(info) => info.name.as_deref(),
        }
    }
}

// =============================================================================
// Property Types
// =============================================================================

/// A property listing.
///
/// Search and featured endpoints return a flattened DTO (`propertyId`,
/// `areaName`, `cityName`); detail and owner endpoints return the raw entity
/// (`id`, nested `area` and `propertyType` objects). Both decode into this
/// struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(alias = "propertyId")]
    pub id: PropertyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Legacy flat type string on raw entities.
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub property_type: Option<PropertyTypeRef>,
    /// Nested locality object (raw entity shape).
    #[serde(default)]
    pub area: Option<AreaInfo>,
    /// Flat locality name (mapped DTO shape).
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default, alias = "cityName")]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    /// Pre-formatted price string (e.g. "75 Lakhs"), preferred for display.
    #[serde(default)]
    pub price_display: Option<String>,
    #[serde(default)]
    pub area_sqft: Option<Decimal>,
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub balconies: Option<i32>,
    /// Comma-separated amenity list.
    #[serde(default)]
    pub amenities: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// "sale" or "rent".
    #[serde(default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_ready_to_move: bool,
    /// "owner" or "broker".
    #[serde(default)]
    pub owner_type: Option<String>,
    #[serde(default)]
    pub user: Option<PropertyOwner>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Property {
    /// Display price: backend-provided display string, else INR-formatted
    /// numeric price, else a placeholder.
    #[must_use]
    pub fn display_price(&self) -> String {
        if let Some(display) = self.price_display.as_deref().filter(|d| !d.is_empty()) {
            return display.to_string();
        }
        self.price
            .as_ref()
            .map_or_else(|| "Price on request".to_string(), ToString::to_string)
    }

    /// Locality name from whichever shape the response used.
    #[must_use]
    pub fn area_display(&self) -> Option<&str> {
        self.area_name
            .as_deref()
            .or_else(|| self.area.as_ref().and_then(|a| a.name.as_deref()))
    }

    /// "Area, City" location line.
    #[must_use]
    pub fn location(&self) -> String {
        match (self.area_display(), self.city.as_deref()) {
            (Some(area), Some(city)) => format!("{area}, {city}"),
            (Some(one), None) | (None, Some(one)) => one.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Property type name from whichever shape the response used.
    #[must_use]
    pub fn property_type_name(&self) -> Option<&str> {
        self.property_type
            .as_ref()
            .and_then(PropertyTypeRef::name)
            .or(self.type_name.as_deref())
    }

    /// Cover image URL, falling back to the bundled placeholder.
    #[must_use]
    pub fn cover_image(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => "/static/img/property-placeholder.svg",
        }
    }

    /// Amenities split into display chips.
    #[must_use]
    pub fn amenity_list(&self) -> Vec<&str> {
        self.amenities
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether this is a rental listing.
    #[must_use]
    pub fn is_for_rent(&self) -> bool {
        self.listing_type
            .as_deref()
            .is_some_and(|lt| lt.eq_ignore_ascii_case("rent"))
    }
}

// =============================================================================
// Deal Types
// =============================================================================

/// A deal as returned by the deal endpoints.
///
/// The stage is kept as the raw backend string; accessors parse it on demand
/// so that an unrecognized stage renders with neutral styling instead of
/// failing the whole response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    #[serde(alias = "id")]
    pub deal_id: DealId,
    /// Raw stage string, mirrored by some endpoints under `stage`.
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub agreed_price: Option<Price>,
    /// Accumulated notes log, newest entry appended by the backend.
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_updated_by: Option<String>,

    #[serde(default)]
    pub property_id: Option<PropertyId>,
    #[serde(default)]
    pub property_title: Option<String>,
    #[serde(default)]
    pub property_price: Option<Price>,
    #[serde(default)]
    pub property_city: Option<String>,

    #[serde(default)]
    pub buyer_id: Option<UserId>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub buyer_email: Option<String>,
    #[serde(default)]
    pub buyer_mobile: Option<String>,

    #[serde(default)]
    pub seller_id: Option<UserId>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub seller_email: Option<String>,
    #[serde(default)]
    pub seller_mobile: Option<String>,

    #[serde(default)]
    pub agent_id: Option<UserId>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub agent_email: Option<String>,
    #[serde(default)]
    pub agent_mobile: Option<String>,

    #[serde(default)]
    pub inquiry_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub shortlist_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub negotiation_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub agreement_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub registration_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub payment_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_date: Option<NaiveDateTime>,

    /// Workflow flags; absent on older backend versions, treated as false.
    #[serde(default)]
    pub seller_confirmed: bool,
    #[serde(default)]
    pub admin_verified: bool,
    #[serde(default)]
    pub payment_initiated: bool,
    #[serde(default)]
    pub payment_completed: bool,
    #[serde(default)]
    pub buyer_doc_uploaded: bool,
}

/// One completed step on a deal's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub stage: DealStage,
    /// Emoji-prefixed stage label for display.
    pub label: &'static str,
    pub date: NaiveDateTime,
}

impl Deal {
    /// Raw stage string, preferring `currentStage` over the `stage` mirror.
    #[must_use]
    pub fn stage_raw(&self) -> &str {
        self.current_stage
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.stage.as_deref())
            .unwrap_or_default()
    }

    /// Parsed stage, `None` when the backend sent something unrecognized.
    #[must_use]
    pub fn parsed_stage(&self) -> Option<DealStage> {
        DealStage::parse(self.stage_raw())
    }

    /// Stage for progress and next-stage math; unknown stages clamp to the
    /// first stage.
    #[must_use]
    pub fn effective_stage(&self) -> DealStage {
        self.parsed_stage().unwrap_or_default()
    }

    /// Completion percentage across the seven stages.
    #[must_use]
    pub fn progress_percentage(&self) -> f64 {
        self.effective_stage().progress_percentage()
    }

    /// Badge color for the current stage; gray for unknown stages.
    #[must_use]
    pub fn stage_color(&self) -> &'static str {
        DealStage::color_for(self.stage_raw())
    }

    /// Display label: canonical name for known stages, the raw string
    /// otherwise.
    #[must_use]
    pub fn stage_label(&self) -> &str {
        self.parsed_stage()
            .map_or_else(|| self.stage_raw(), DealStage::name)
    }

    /// Stages offered in the stage-change form: the current stage and
    /// everything after it.
    #[must_use]
    pub fn next_stage_options(&self) -> &'static [DealStage] {
        self.effective_stage().next_options()
    }

    /// A deal stays active until it reaches COMPLETED.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.parsed_stage() != Some(DealStage::Completed)
    }

    /// Recorded date for one stage, if that stage has been reached.
    #[must_use]
    pub const fn stage_date(&self, stage: DealStage) -> Option<NaiveDateTime> {
        match stage {
            DealStage::Inquiry => self.inquiry_date,
            DealStage::Shortlist => self.shortlist_date,
            DealStage::Negotiation => self.negotiation_date,
            DealStage::Agreement => self.agreement_date,
            DealStage::Registration => self.registration_date,
            DealStage::Payment => self.payment_date,
            DealStage::Completed => self.completed_date,
        }
    }

    /// Timeline of completed stages, sorted by recorded date.
    ///
    /// Only stages with a recorded date appear. Ordering follows the dates
    /// themselves, not stage order, so an out-of-order correction shows where
    /// it actually happened.
    #[must_use]
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let mut entries: Vec<TimelineEntry> = DealStage::ALL
            .iter()
            .filter_map(|&stage| {
                self.stage_date(stage).map(|date| TimelineEntry {
                    stage,
                    label: stage.timeline_label(),
                    date,
                })
            })
            .collect();
        entries.sort_by_key(|entry| entry.date);
        entries
    }

    /// Display price: the negotiated price when set, else the listing price.
    #[must_use]
    pub fn display_price(&self) -> Option<String> {
        self.agreed_price
            .as_ref()
            .or(self.property_price.as_ref())
            .map(ToString::to_string)
    }
}

// =============================================================================
// Analytics Types
// =============================================================================

/// Per-agent deal statistics for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    pub agent_id: UserId,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub agent_email: Option<String>,
    #[serde(default)]
    pub agent_mobile: Option<String>,
    #[serde(default)]
    pub total_deals: i64,
    #[serde(default)]
    pub active_deals: i64,
    #[serde(default)]
    pub completed_deals: i64,
    /// Pre-formatted by the backend (e.g. "75.50%").
    #[serde(default)]
    pub conversion_rate: Option<String>,
    #[serde(default)]
    pub average_deal_price: Option<Price>,
    #[serde(default)]
    pub inquiry_count: i64,
    #[serde(default)]
    pub shortlist_count: i64,
    #[serde(default)]
    pub negotiation_count: i64,
    #[serde(default)]
    pub agreement_count: i64,
    #[serde(default)]
    pub registration_count: i64,
    #[serde(default)]
    pub payment_count: i64,
}

/// Aggregate deal statistics for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    #[serde(default)]
    pub total_deals: i64,
    #[serde(default)]
    pub active_deal_count: i64,
    #[serde(default)]
    pub completed_deal_count: i64,
    /// Counts keyed by raw stage name.
    #[serde(default)]
    pub deals_by_stage: BTreeMap<String, i64>,
    #[serde(default)]
    pub agent_performance: Vec<AgentPerformance>,
    /// Month label to deal count, for trend charts.
    #[serde(default)]
    pub deals_trend_by_month: BTreeMap<String, i64>,
}

impl AdminDashboard {
    /// Stage counts in canonical stage order (missing stages count zero).
    #[must_use]
    pub fn stage_counts(&self) -> Vec<(DealStage, i64)> {
        DealStage::ALL
            .iter()
            .map(|&stage| {
                let count = self.deals_by_stage.get(stage.name()).copied().unwrap_or(0);
                (stage, count)
            })
            .collect()
    }
}

/// Personal statistics shown on the agent dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    #[serde(default)]
    pub total_deals: i64,
    #[serde(default)]
    pub active_deal_count: i64,
    #[serde(default)]
    pub completed_deal_count: i64,
    #[serde(default)]
    pub properties_managed: i64,
    /// Counts keyed by raw stage name.
    #[serde(default)]
    pub stage_breakdown: BTreeMap<String, i64>,
    /// Pre-formatted by the backend (e.g. "75.00%").
    #[serde(default)]
    pub conversion_rate: Option<String>,
}

impl AgentStats {
    /// Stage counts in canonical stage order (missing stages count zero).
    #[must_use]
    pub fn stage_counts(&self) -> Vec<(DealStage, i64)> {
        DealStage::ALL
            .iter()
            .map(|&stage| {
                let count = self.stage_breakdown.get(stage.name()).copied().unwrap_or(0);
                (stage, count)
            })
            .collect()
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// New-account payload for `POST /api/auth/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
    pub role: UserRole,
}

/// Successful login payload: the issued bearer token plus the account.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Stage transition for `PUT /api/deals/{id}/stage`.
///
/// The backend appends the notes to the deal's log and stamps the stage date
/// itself; the date here records when the step actually happened.
#[derive(Debug, Serialize)]
pub struct StageUpdateRequest {
    pub stage: DealStage,
    pub notes: String,
    pub date: NaiveDate,
}

/// New-deal payload for `POST /api/deals/create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    pub property_id: PropertyId,
    pub buyer_id: UserId,
    pub agent_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreed_price: Option<Decimal>,
    pub notes: String,
}

/// Filter payload for `POST /api/properties/search`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bedrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bedrooms: Option<i32>,
    pub sort_by: String,
    pub sort_order: String,
    pub page: i32,
    pub size: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ready_to_move: Option<bool>,
}

impl PropertySearchRequest {
    /// Backend defaults: newest first, first page of 20.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sort_by: "createdAt".to_string(),
            sort_order: "DESC".to_string(),
            page: 0,
            size: 20,
            ..Self::default()
        }
    }
}

/// New-listing payload for `POST /api/properties`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCreateRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balconies: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_sqft: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<IdRef>,
    pub user: IdRef,
    #[serde(rename = "type")]
    pub type_name: String,
    pub listing_type: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub is_active: bool,
    pub owner_type: String,
    pub is_ready_to_move: bool,
    pub is_verified: bool,
}

/// `{ "id": n }` reference wrapper used in nested request payloads.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IdRef {
    pub id: i64,
}

/// Profile update payload for `PUT /api/users/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_deal_json() -> serde_json::Value {
        json!({
            "dealId": 42,
            "stage": "NEGOTIATION",
            "currentStage": "NEGOTIATION",
            "agreedPrice": 7_500_000,
            "notes": "[2024-01-10] Inquiry received",
            "createdAt": "2024-01-10T09:00:00",
            "updatedAt": "2024-01-18T14:30:00",
            "lastUpdatedBy": "asha.agent",
            "propertyId": 7,
            "propertyTitle": "3BHK in Gachibowli",
            "propertyPrice": 8_000_000,
            "propertyCity": "Hyderabad",
            "buyerId": 11,
            "buyerName": "Ravi Kumar",
            "buyerMobile": "9876543210",
            "sellerId": 12,
            "sellerName": "Meena Rao",
            "agentId": 13,
            "agentName": "Asha Pillai",
            "inquiryDate": "2024-01-10T09:00:00",
            "shortlistDate": "2024-01-12T11:00:00",
            "negotiationDate": "2024-01-18T14:30:00"
        })
    }

    #[test]
    fn test_deal_decodes_dto_shape() {
        let deal: Deal = serde_json::from_value(sample_deal_json()).unwrap();
        assert_eq!(deal.deal_id.as_i64(), 42);
        assert_eq!(deal.parsed_stage(), Some(DealStage::Negotiation));
        assert_eq!(deal.property_title.as_deref(), Some("3BHK in Gachibowli"));
        assert!(!deal.seller_confirmed);
        assert!(deal.is_active());
    }

    #[test]
    fn test_deal_decodes_entity_shape_with_id_alias() {
        let deal: Deal = serde_json::from_value(json!({
            "id": 9,
            "stage": "COMPLETED"
        }))
        .unwrap();
        assert_eq!(deal.deal_id.as_i64(), 9);
        assert_eq!(deal.parsed_stage(), Some(DealStage::Completed));
        assert!(!deal.is_active());
    }

    #[test]
    fn test_unknown_stage_renders_neutrally() {
        let deal: Deal = serde_json::from_value(json!({
            "dealId": 1,
            "currentStage": "ESCROW"
        }))
        .unwrap();
        assert_eq!(deal.parsed_stage(), None);
        assert_eq!(deal.stage_label(), "ESCROW");
        assert_eq!(deal.stage_color(), estatehub_core::UNKNOWN_STAGE_COLOR);
        // Clamps to the first stage for progress and options
        assert!((deal.progress_percentage() - DealStage::Inquiry.progress_percentage()).abs() < f64::EPSILON);
        assert_eq!(deal.next_stage_options(), &DealStage::ALL);
    }

    #[test]
    fn test_timeline_sorted_by_date_not_stage_order() {
        let mut deal: Deal = serde_json::from_value(sample_deal_json()).unwrap();
        // Backdated correction: negotiation recorded before the shortlist date
        deal.negotiation_date =
            Some(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap().and_hms_opt(8, 0, 0).unwrap());

        let timeline = deal.timeline();
        let stages: Vec<DealStage> = timeline.iter().map(|e| e.stage).collect();
        assert_eq!(
            stages,
            vec![DealStage::Inquiry, DealStage::Negotiation, DealStage::Shortlist]
        );
        assert!(timeline.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_timeline_skips_unreached_stages() {
        let deal: Deal = serde_json::from_value(sample_deal_json()).unwrap();
        let timeline = deal.timeline();
        assert_eq!(timeline.len(), 3);
        assert!(timeline.iter().all(|e| e.stage != DealStage::Completed));
    }

    #[test]
    fn test_deal_next_options_from_current() {
        let deal: Deal = serde_json::from_value(sample_deal_json()).unwrap();
        let options = deal.next_stage_options();
        assert_eq!(options.first(), Some(&DealStage::Negotiation));
        assert_eq!(options.last(), Some(&DealStage::Completed));
        assert_eq!(options.len(), 5);
    }

    #[test]
    fn test_property_decodes_search_dto_shape() {
        let property: Property = serde_json::from_value(json!({
            "propertyId": 101,
            "title": "2BHK near Hitec City",
            "propertyType": "Flat +2",
            "price": 4_500_000,
            "areaName": "Madhapur",
            "cityName": "Hyderabad",
            "isFeatured": true
        }))
        .unwrap();
        assert_eq!(property.id.as_i64(), 101);
        assert_eq!(property.property_type_name(), Some("Flat +2"));
        assert_eq!(property.location(), "Madhapur, Hyderabad");
        assert!(property.is_featured);
    }

    #[test]
    fn test_property_decodes_entity_shape() {
        let property: Property = serde_json::from_value(json!({
            "id": 55,
            "title": "Villa in Kokapet",
            "type": "Villa",
            "city": "Hyderabad",
            "area": {"areaId": 3, "areaName": "Kokapet", "city": {"cityId": 1, "cityName": "Hyderabad"}},
            "propertyType": {"propertyTypeId": 2, "typeName": "Villa"},
            "user": {"id": 12, "firstName": "Meena", "lastName": "Rao", "mobileNumber": "9876501234"},
            "listingType": "sale"
        }))
        .unwrap();
        assert_eq!(property.id.as_i64(), 55);
        assert_eq!(property.area_display(), Some("Kokapet"));
        assert_eq!(property.property_type_name(), Some("Villa"));
        assert_eq!(
            property.user.unwrap().display_name().as_deref(),
            Some("Meena Rao")
        );
    }

    #[test]
    fn test_property_display_price_prefers_display_string() {
        let property: Property = serde_json::from_value(json!({
            "propertyId": 1,
            "title": "t",
            "price": 7_500_000,
            "priceDisplay": "75 Lakhs"
        }))
        .unwrap();
        assert_eq!(property.display_price(), "75 Lakhs");
    }

    #[test]
    fn test_property_display_price_formats_inr() {
        let property: Property = serde_json::from_value(json!({
            "propertyId": 1,
            "title": "t",
            "price": 7_500_000
        }))
        .unwrap();
        assert_eq!(property.display_price(), "₹75,00,000");
    }

    #[test]
    fn test_property_amenity_list() {
        let property: Property = serde_json::from_value(json!({
            "propertyId": 1,
            "title": "t",
            "amenities": "Lift, Parking , Gym,"
        }))
        .unwrap();
        assert_eq!(property.amenity_list(), vec!["Lift", "Parking", "Gym"]);
    }

    #[test]
    fn test_auth_payload_decodes_login_envelope() {
        let value = json!({
            "success": true,
            "data": {
                "message": "Login successful!",
                "token": "eyJhbGciOi...",
                "user": {"id": 11, "username": "ravi", "role": "BUYER"}
            }
        });
        let payload: AuthPayload = crate::backend::normalize_item(value).unwrap();
        assert_eq!(payload.user.id.as_i64(), 11);
        assert_eq!(payload.user.role, UserRole::Buyer);
        assert!(!payload.token.is_empty());
    }

    #[test]
    fn test_user_legacy_role_alias() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "username": "old-account",
            "role": "USER"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Buyer);
    }

    #[test]
    fn test_user_display_name_fallbacks() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "username": "ravi",
            "role": "BUYER"
        }))
        .unwrap();
        assert_eq!(user.display_name(), "ravi");

        let user: User = serde_json::from_value(json!({
            "id": 3,
            "firstName": "Ravi",
            "lastName": "Kumar",
            "role": "BUYER"
        }))
        .unwrap();
        assert_eq!(user.display_name(), "Ravi Kumar");
    }

    #[test]
    fn test_agent_performance_decodes() {
        let perf: AgentPerformance = serde_json::from_value(json!({
            "agentId": 13,
            "agentName": "Asha Pillai",
            "totalDeals": 8,
            "activeDeals": 2,
            "completedDeals": 6,
            "conversionRate": "75.00%",
            "averageDealPrice": 6_200_000
        }))
        .unwrap();
        assert_eq!(perf.completed_deals, 6);
        assert_eq!(perf.conversion_rate.as_deref(), Some("75.00%"));
    }

    #[test]
    fn test_admin_dashboard_stage_counts_canonical_order() {
        let dashboard: AdminDashboard = serde_json::from_value(json!({
            "totalDeals": 10,
            "activeDealCount": 7,
            "completedDealCount": 3,
            "dealsByStage": {"PAYMENT": 2, "INQUIRY": 5, "COMPLETED": 3}
        }))
        .unwrap();

        let counts = dashboard.stage_counts();
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0], (DealStage::Inquiry, 5));
        assert_eq!(counts[5], (DealStage::Payment, 2));
        assert_eq!(counts[6], (DealStage::Completed, 3));
        // Stages absent from the map read as zero
        assert_eq!(counts[1], (DealStage::Shortlist, 0));
    }

    #[test]
    fn test_agent_stats_decode_and_breakdown() {
        let stats: AgentStats = serde_json::from_value(json!({
            "totalDeals": 8,
            "activeDealCount": 5,
            "completedDealCount": 3,
            "propertiesManaged": 12,
            "stageBreakdown": {"NEGOTIATION": 2, "INQUIRY": 3},
            "conversionRate": "37.50%"
        }))
        .unwrap();
        assert_eq!(stats.properties_managed, 12);
        let counts = stats.stage_counts();
        assert_eq!(counts[0], (DealStage::Inquiry, 3));
        assert_eq!(counts[2], (DealStage::Negotiation, 2));
        assert_eq!(counts[6], (DealStage::Completed, 0));
    }

    #[test]
    fn test_stage_update_request_serializes_screaming_stage() {
        let request = StageUpdateRequest {
            stage: DealStage::Agreement,
            notes: "Token advance received".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stage"], "AGREEMENT");
        assert_eq!(value["date"], "2024-02-01");
    }

    #[test]
    fn test_search_request_defaults() {
        let request = PropertySearchRequest::new();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sortBy"], "createdAt");
        assert_eq!(value["sortOrder"], "DESC");
        assert_eq!(value["page"], 0);
        assert_eq!(value["size"], 20);
        // Unset filters are omitted entirely
        assert!(value.get("minPrice").is_none());
    }
}
