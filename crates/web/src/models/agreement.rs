//! Rental agreement records.
//!
//! Agreements are generated entirely in this app and persisted only in the
//! visitor's session; nothing is sent to the backend. They disappear with
//! the session, like the original clear-on-logout behavior.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated rental agreement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalAgreement {
    /// Locally assigned identifier.
    pub id: Uuid,
    pub landlord_name: String,
    pub tenant_name: String,
    pub property_address: String,
    pub city: String,
    pub monthly_rent: Decimal,
    pub security_deposit: Decimal,
    /// Term length in months.
    pub duration_months: u32,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl RentalAgreement {
    /// Last day covered by the agreement term.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.start_date
            .checked_add_months(Months::new(self.duration_months))
            .and_then(|d| d.pred_opt())
            .unwrap_or(self.start_date)
    }

    /// Document title. Terms up to 11 months are rental agreements; longer
    /// terms are lease agreements under Indian registration convention.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        if self.duration_months <= 11 {
            "Rental Agreement"
        } else {
            "Lease Agreement"
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn agreement(duration_months: u32) -> RentalAgreement {
        RentalAgreement {
            id: Uuid::new_v4(),
            landlord_name: "Meena Rao".to_string(),
            tenant_name: "Ravi Kumar".to_string(),
            property_address: "12-3 Jubilee Hills".to_string(),
            city: "Hyderabad".to_string(),
            monthly_rent: Decimal::from(25_000),
            security_deposit: Decimal::from(50_000),
            duration_months,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_end_date_is_term_minus_one_day() {
        assert_eq!(
            agreement(11).end_date(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
        assert_eq!(
            agreement(12).end_date(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_twelve_months_and_up_is_a_lease() {
        assert_eq!(agreement(11).kind(), "Rental Agreement");
        assert_eq!(agreement(12).kind(), "Lease Agreement");
        assert_eq!(agreement(36).kind(), "Lease Agreement");
    }

    #[test]
    fn test_agreement_round_trips_through_session_serialization() {
        let agreement = agreement(11);
        let json = serde_json::to_string(&agreement).unwrap();
        let back: RentalAgreement = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, agreement.id);
        assert_eq!(back.monthly_rent, agreement.monthly_rent);
        assert_eq!(back.start_date, agreement.start_date);
    }
}
