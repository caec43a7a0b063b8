//! Rental agreement generator routes.
//!
//! The generator is a self-contained tool: agreements are built here and
//! kept in the visitor's session, never sent to the backend. They survive
//! login and logout but disappear when the session expires.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::agreement::RentalAgreement;
use crate::models::session::{CurrentUser, keys};
use crate::routes::{MessageQuery, redirect_error, redirect_success};

// =============================================================================
// Templates
// =============================================================================

/// Agreement generator form template.
#[derive(Template, WebTemplate)]
#[template(path = "agreements/generator.html")]
pub struct AgreementGeneratorTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
}

/// Generated agreements list template.
#[derive(Template, WebTemplate)]
#[template(path = "agreements/list.html")]
pub struct AgreementListTemplate {
    pub user: Option<CurrentUser>,
    /// Newest first.
    pub agreements: Vec<RentalAgreement>,
    pub success: Option<String>,
}

// =============================================================================
// Form Types
// =============================================================================

/// Agreement generator form submission.
#[derive(Debug, Deserialize)]
pub struct AgreementForm {
    pub landlord_name: String,
    pub tenant_name: String,
    pub property_address: String,
    pub city: String,
    pub monthly_rent: String,
    pub security_deposit: String,
    pub duration_months: String,
    pub start_date: String,
}

impl AgreementForm {
    /// Build the agreement, or explain what is wrong with the form.
    fn build(&self) -> std::result::Result<RentalAgreement, &'static str> {
        let landlord_name = self.landlord_name.trim();
        let tenant_name = self.tenant_name.trim();
        let property_address = self.property_address.trim();
        let city = self.city.trim();

        if landlord_name.is_empty()
            || tenant_name.is_empty()
            || property_address.is_empty()
            || city.is_empty()
        {
            return Err("Please fill in all fields of the agreement form.");
        }

        let monthly_rent = self
            .monthly_rent
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|rent| *rent > Decimal::ZERO)
            .ok_or("Please enter a valid monthly rent.")?;

        let security_deposit = self
            .security_deposit
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|deposit| *deposit >= Decimal::ZERO)
            .ok_or("Please enter a valid security deposit.")?;

        let duration_months = self
            .duration_months
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|months| (1..=120).contains(months))
            .ok_or("Please choose an agreement duration.")?;

        let start_date = self
            .start_date
            .trim()
            .parse::<NaiveDate>()
            .map_err(|_| "Please enter the start date as YYYY-MM-DD.")?;

        Ok(RentalAgreement {
            id: Uuid::new_v4(),
            landlord_name: landlord_name.to_string(),
            tenant_name: tenant_name.to_string(),
            property_address: property_address.to_string(),
            city: city.to_string(),
            monthly_rent,
            security_deposit,
            duration_months,
            start_date,
            created_at: Utc::now(),
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the agreement generator form.
pub async fn generator(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    AgreementGeneratorTemplate {
        user,
        error: query.error,
    }
    .into_response()
}

/// Handle the generator form: validate, stow in the session, show the list.
#[instrument(skip(session, form))]
pub async fn generate(session: Session, Form(form): Form<AgreementForm>) -> Response {
    let agreement = match form.build() {
        Ok(agreement) => agreement,
        Err(message) => return redirect_error("/rental-agreement", message),
    };

    let mut agreements: Vec<RentalAgreement> = match session.get(keys::RENTAL_AGREEMENTS).await {
        Ok(stored) => stored.unwrap_or_default(),
        Err(e) => {
            tracing::error!("Failed to read agreements from session: {e}");
            Vec::new()
        }
    };
    agreements.push(agreement);

    if let Err(e) = session.insert(keys::RENTAL_AGREEMENTS, &agreements).await {
        tracing::error!("Failed to store agreement in session: {e}");
        return redirect_error(
            "/rental-agreement",
            "Could not save the agreement. Please try again.",
        );
    }

    redirect_success("/my-agreements", "Agreement generated.")
}

/// Display the visitor's generated agreements, newest first.
#[instrument(skip(session))]
pub async fn my_agreements(
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Response {
    let mut agreements: Vec<RentalAgreement> = match session.get(keys::RENTAL_AGREEMENTS).await {
        Ok(stored) => stored.unwrap_or_default(),
        Err(e) => {
            tracing::error!("Failed to read agreements from session: {e}");
            Vec::new()
        }
    };
    agreements.reverse();

    AgreementListTemplate {
        user,
        agreements,
        success: query.success,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> AgreementForm {
        AgreementForm {
            landlord_name: "Meena Rao".to_string(),
            tenant_name: "Ravi Kumar".to_string(),
            property_address: "12-3 Jubilee Hills".to_string(),
            city: "Hyderabad".to_string(),
            monthly_rent: "25000".to_string(),
            security_deposit: "50000".to_string(),
            duration_months: "11".to_string(),
            start_date: "2024-03-01".to_string(),
        }
    }

    #[test]
    fn test_complete_form_builds_agreement() {
        let agreement = valid_form().build().unwrap();
        assert_eq!(agreement.monthly_rent, Decimal::from(25_000));
        assert_eq!(agreement.duration_months, 11);
        assert_eq!(agreement.kind(), "Rental Agreement");
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let mut form = valid_form();
        form.tenant_name = "   ".to_string();
        assert!(form.build().is_err());
    }

    #[test]
    fn test_zero_rent_is_rejected() {
        let mut form = valid_form();
        form.monthly_rent = "0".to_string();
        assert!(form.build().is_err());
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        let mut form = valid_form();
        form.start_date = "01/03/2024".to_string();
        assert!(form.build().is_err());
    }
}
