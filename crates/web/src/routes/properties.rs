//! Property detail and owner-listing route handlers.
//!
//! `/property/{id}` renders one listing. `/my-properties` shows the signed-in
//! user's listings next to the post-a-property form; the form submits as
//! multipart so the photo can ride along and be pushed to the asset host
//! before the listing is sent to the backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use tracing::instrument;

use estatehub_core::{PropertyId, format_inr_compact};

use crate::backend::types::{
    AreaInfo, Deal, IdRef, Property, PropertyCreateRequest, PropertyTypeInfo,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::capabilities::role_capabilities;
use crate::models::session::CurrentUser;
use crate::routes::{DEFAULT_CITY, MessageQuery, redirect_error, redirect_success, user_message};
use crate::state::AppState;

// Listing limits enforced before the backend sees the payload.
const MAX_PRICE: i64 = 1_000_000_000;
const MAX_ROOMS: i32 = 10;
const MAX_AREA_SQFT: i64 = 9_999;

// =============================================================================
// Templates
// =============================================================================

/// Property detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "properties/show.html")]
pub struct PropertyShowTemplate {
    pub user: Option<CurrentUser>,
    pub property: Property,
    /// Existing deal on this listing, shown to agents instead of the
    /// start-a-deal link.
    pub existing_deal: Option<Deal>,
    /// Whether the viewer may start a deal on this listing.
    pub can_create_deal: bool,
}

/// Owner listings page template, with the post-a-property form.
#[derive(Template, WebTemplate)]
#[template(path = "properties/my_properties.html")]
pub struct MyPropertiesTemplate {
    pub user: Option<CurrentUser>,
    pub properties: Vec<Property>,
    pub localities: Vec<AreaInfo>,
    pub property_types: Vec<PropertyTypeInfo>,
    pub default_city: &'static str,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display one property listing.
///
/// Agents additionally see the deal attached to this listing, or an entry
/// point to create one.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<PropertyId>,
) -> Result<Response> {
    let property = state.backend().property(id).await?;

    let can_create_deal = user
        .as_ref()
        .is_some_and(|u| role_capabilities(u.role).create_deal);

    let existing_deal = match user.as_ref().filter(|_| can_create_deal) {
        Some(agent) => state
            .backend()
            .deals_by_property(id, &agent.token)
            .await
            .map_or_else(
                |e| {
                    tracing::error!("Failed to fetch deals for property {id}: {e}");
                    None
                },
                |deals| deals.into_iter().next(),
            ),
        None => None,
    };

    Ok(PropertyShowTemplate {
        user,
        property,
        existing_deal,
        can_create_deal,
    }
    .into_response())
}

/// Display the signed-in user's listings and the post-a-property form.
#[instrument(skip(state, user))]
pub async fn my_properties(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let properties = state
        .backend()
        .properties_by_user(user.id, &user.token)
        .await
        .map_or_else(
            |e| {
                tracing::error!("Failed to fetch listings for user {}: {e}", user.id);
                Vec::new()
            },
            |properties| properties,
        );

    let localities = state.backend().areas(DEFAULT_CITY).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch areas for {DEFAULT_CITY}: {e}");
            Vec::new()
        },
        |areas| areas.as_ref().clone(),
    );

    let property_types = state.backend().property_types().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch property types: {e}");
            Vec::new()
        },
        |types| types.as_ref().clone(),
    );

    MyPropertiesTemplate {
        user: Some(user),
        properties,
        localities,
        property_types,
        default_city: DEFAULT_CITY,
        error: query.error,
        success: query.success,
    }
}

/// Handle the post-a-property form submission.
///
/// Validates locally, uploads the photo to the asset host, then creates the
/// listing. Every rejection redirects back with a banner message.
#[instrument(skip(state, user, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    multipart: Multipart,
) -> Result<Response> {
    let form = ListingForm::read(multipart).await?;

    if let Err(message) = form.validate() {
        return Ok(redirect_error("/my-properties", message));
    }

    let Some(assets) = state.assets() else {
        return Ok(redirect_error(
            "/my-properties",
            "Photo uploads are not configured on this server.",
        ));
    };
    // validate() guarantees the photo is present
    let Some(photo) = form.photo.as_ref() else {
        return Ok(redirect_error("/my-properties", "A property photo is required."));
    };

    let image_url = match assets
        .upload(&photo.file_name, &photo.content_type, photo.bytes.clone())
        .await
    {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Photo upload failed: {e}");
            return Ok(redirect_error(
                "/my-properties",
                "Could not upload the photo. Please try again.",
            ));
        }
    };

    let request = form.to_request(&state, &user, image_url).await;
    match state.backend().create_property(&request, &user.token).await {
        Ok(()) => Ok(redirect_success(
            "/my-properties",
            "Property posted successfully!",
        )),
        Err(e) => {
            tracing::warn!("Listing creation failed: {e}");
            Ok(redirect_error("/my-properties", &user_message(&e)))
        }
    }
}

// =============================================================================
// Listing Form
// =============================================================================

/// An uploaded photo, held until validation passes.
struct UploadedPhoto {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Raw post-a-property form, one field per multipart part.
#[derive(Default)]
struct ListingForm {
    title: String,
    type_name: String,
    listing_type: String,
    city: String,
    area_id: Option<i64>,
    address: String,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    balconies: Option<i32>,
    area_sqft: Option<Decimal>,
    price: Option<Decimal>,
    amenities: Vec<String>,
    description: String,
    owner_type: String,
    ready_to_move: bool,
    photo: Option<UploadedPhoto>,
}

impl ListingForm {
    /// Drain the multipart stream into a form value.
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?
        {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if name == "photo" {
                let file_name = field.file_name().unwrap_or("listing.jpg").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;
                // An empty part means the file input was left blank
                if !bytes.is_empty() {
                    form.photo = Some(UploadedPhoto {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;
            let value = value.trim().to_string();

            match name.as_str() {
                "title" => form.title = value,
                "type" => form.type_name = value,
                "listing_type" => form.listing_type = value,
                "city" => form.city = value,
                "area_id" => form.area_id = value.parse().ok(),
                "address" => form.address = value,
                "bedrooms" => form.bedrooms = value.parse().ok(),
                "bathrooms" => form.bathrooms = value.parse().ok(),
                "balconies" => form.balconies = value.parse().ok(),
                "area_sqft" => form.area_sqft = value.parse().ok(),
                "price" => form.price = value.parse().ok(),
                "amenities" => form.amenities.push(value),
                "description" => form.description = value,
                "owner_type" => form.owner_type = value,
                "ready_to_move" => form.ready_to_move = value == "on" || value == "true",
                _ => {}
            }
        }

        Ok(form)
    }

    /// Required fields and limits, checked before any backend call.
    fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.title.is_empty()
            || self.description.is_empty()
            || self.area_id.is_none()
            || self.bedrooms.is_none()
            || self.bathrooms.is_none()
            || self.price.is_none()
            || self.photo.is_none()
        {
            return Err("Please fill in all required fields, including a property photo.");
        }

        let price = self.price.unwrap_or_default();
        if price <= Decimal::ZERO || price > Decimal::from(MAX_PRICE) {
            return Err("Please enter a valid price, not exceeding ₹100 Crore.");
        }

        let too_many_rooms = [self.bedrooms, self.bathrooms, self.balconies]
            .into_iter()
            .flatten()
            .any(|count| count > MAX_ROOMS);
        if too_many_rooms {
            return Err("Bedrooms, bathrooms and balconies cannot exceed 10.");
        }

        if self.area_sqft.unwrap_or_default() > Decimal::from(MAX_AREA_SQFT) {
            return Err("Built-up area cannot exceed 9,999 sqft.");
        }

        Ok(())
    }

    /// Build the backend payload. New listings go up featured, active and
    /// unverified, matching how the marketplace moderates them.
    async fn to_request(
        &self,
        state: &AppState,
        user: &CurrentUser,
        image_url: String,
    ) -> PropertyCreateRequest {
        let city = if self.city.is_empty() {
            DEFAULT_CITY.to_string()
        } else {
            self.city.clone()
        };

        let address = if self.address.is_empty() {
            self.locality_address(state, &city).await
        } else {
            self.address.clone()
        };

        let price = self.price.unwrap_or_default();

        PropertyCreateRequest {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            image_url: Some(image_url),
            price: Some(price),
            price_display: Some(format_inr_compact(price)),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            balconies: Some(self.balconies.unwrap_or(0)),
            area_sqft: self.area_sqft,
            area: self.area_id.map(|id| IdRef { id }),
            user: IdRef {
                id: user.id.as_i64(),
            },
            type_name: self.type_name.clone(),
            listing_type: self.listing_type.clone(),
            city,
            address: Some(address),
            amenities: (!self.amenities.is_empty()).then(|| self.amenities.join(", ")),
            status: "available".to_string(),
            is_featured: true,
            is_active: true,
            owner_type: self.owner_type.clone(),
            is_ready_to_move: self.ready_to_move,
            is_verified: false,
        }
    }

    /// "Locality, City" fallback when no street address was given.
    async fn locality_address(&self, state: &AppState, city: &str) -> String {
        let area_name = match (self.area_id, state.backend().areas(city).await) {
            (Some(id), Ok(areas)) => areas
                .iter()
                .find(|area| area.id == Some(id.into()))
                .and_then(|area| area.name.clone()),
            _ => None,
        };
        area_name.map_or_else(|| city.to_string(), |name| format!("{name}, {city}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ListingForm {
        ListingForm {
            title: "2BHK in Gachibowli".to_string(),
            type_name: "Flat +2".to_string(),
            listing_type: "sale".to_string(),
            city: "Hyderabad".to_string(),
            area_id: Some(3),
            bedrooms: Some(2),
            bathrooms: Some(2),
            price: Some(Decimal::from(7_500_000)),
            description: "Well ventilated corner flat".to_string(),
            photo: Some(UploadedPhoto {
                file_name: "flat.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![0xff, 0xd8],
            }),
            ..ListingForm::default()
        }
    }

    #[test]
    fn test_complete_listing_passes_validation() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_missing_photo_fails_validation() {
        let mut form = valid_form();
        form.photo = None;
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_price_cap_is_one_hundred_crore() {
        let mut form = valid_form();
        form.price = Some(Decimal::from(MAX_PRICE));
        assert!(form.validate().is_ok());
        form.price = Some(Decimal::from(MAX_PRICE + 1));
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_room_counts_are_capped() {
        let mut form = valid_form();
        form.balconies = Some(11);
        assert!(form.validate().is_err());
    }
}
