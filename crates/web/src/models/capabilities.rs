//! Role-capability table for deal screens.
//!
//! One static table answers "what can this role see and do" for every deal
//! view; handlers and templates consult it instead of comparing roles
//! inline. Deal-state conditions (current stage, checkpoint flags) are
//! layered on top for the per-deal answer.

use estatehub_core::{DealStage, UserRole};

use crate::backend::types::Deal;

/// Deal-independent abilities of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCapabilities {
    /// Timeline tab on the deal detail screen.
    pub view_timeline: bool,
    /// Actions tab on the deal detail screen.
    pub view_actions: bool,
    /// Stage-update form.
    pub edit_stage: bool,
    /// Create-deal flow on the agent dashboard.
    pub create_deal: bool,
    /// Admin-only screens (all deals, agent roster, user management).
    pub admin_screens: bool,
}

/// Capability table keyed by role.
#[must_use]
pub const fn role_capabilities(role: UserRole) -> RoleCapabilities {
    match role {
        UserRole::Buyer | UserRole::Seller => RoleCapabilities {
            view_timeline: false,
            view_actions: false,
            edit_stage: false,
            create_deal: false,
            admin_screens: false,
        },
        UserRole::Agent => RoleCapabilities {
            view_timeline: true,
            view_actions: true,
            edit_stage: true,
            create_deal: true,
            admin_screens: false,
        },
        UserRole::Admin => RoleCapabilities {
            view_timeline: true,
            view_actions: true,
            edit_stage: true,
            create_deal: false,
            admin_screens: true,
        },
    }
}

/// What one role can see and do on one specific deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealCapabilities {
    /// Overview tab (every role).
    pub view_overview: bool,
    /// Timeline tab.
    pub view_timeline: bool,
    /// Actions tab.
    pub view_actions: bool,
    /// Stage-update form (hidden once the deal completes).
    pub edit_stage: bool,
    /// Seller confirmation button, REGISTRATION stage only.
    pub confirm_registration: bool,
    /// Payment completion button, PAYMENT stage only.
    pub complete_payment: bool,
    /// Buyer document upload form, while the deal is open.
    pub upload_document: bool,
}

impl DealCapabilities {
    /// Resolve the capability table against a deal's current state.
    #[must_use]
    pub fn for_deal(role: UserRole, deal: &Deal) -> Self {
        let base = role_capabilities(role);
        let stage = deal.effective_stage();
        let active = deal.is_active();

        Self {
            view_overview: true,
            view_timeline: base.view_timeline,
            view_actions: base.view_actions,
            edit_stage: base.edit_stage && active,
            confirm_registration: matches!(role, UserRole::Seller)
                && stage == DealStage::Registration
                && !deal.seller_confirmed,
            complete_payment: matches!(role, UserRole::Agent)
                && stage == DealStage::Payment
                && !deal.payment_completed,
            upload_document: matches!(role, UserRole::Buyer)
                && active
                && !deal.buyer_doc_uploaded,
        }
    }

    /// How many actionable controls this view exposes.
    #[must_use]
    pub const fn action_count(&self) -> usize {
        usize::from(self.edit_stage)
            + usize::from(self.confirm_registration)
            + usize::from(self.complete_payment)
            + usize::from(self.upload_document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deal(stage: &str, flags: serde_json::Value) -> Deal {
        let mut value = json!({ "dealId": 1, "stage": stage });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), flags.as_object()) {
            for (key, flag) in extra {
                base.insert(key.clone(), flag.clone());
            }
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_seller_in_registration_gets_exactly_one_action() {
        let deal = deal("REGISTRATION", json!({ "sellerConfirmed": false }));
        let caps = DealCapabilities::for_deal(UserRole::Seller, &deal);
        assert!(caps.confirm_registration);
        assert!(!caps.edit_stage);
        assert_eq!(caps.action_count(), 1);
    }

    #[test]
    fn test_seller_after_confirmation_has_nothing_left() {
        let deal = deal("REGISTRATION", json!({ "sellerConfirmed": true }));
        let caps = DealCapabilities::for_deal(UserRole::Seller, &deal);
        assert_eq!(caps.action_count(), 0);
    }

    #[test]
    fn test_buyer_has_no_stage_editing_controls() {
        let deal = deal("NEGOTIATION", json!({}));
        let caps = DealCapabilities::for_deal(UserRole::Buyer, &deal);
        assert!(!caps.edit_stage);
        assert!(!caps.view_timeline);
        assert!(!caps.view_actions);
        assert!(caps.upload_document);
        assert_eq!(caps.action_count(), 1);
    }

    #[test]
    fn test_buyer_upload_gone_after_document_or_completion() {
        let uploaded = deal("NEGOTIATION", json!({ "buyerDocUploaded": true }));
        assert!(!DealCapabilities::for_deal(UserRole::Buyer, &uploaded).upload_document);

        let completed = deal("COMPLETED", json!({}));
        assert!(!DealCapabilities::for_deal(UserRole::Buyer, &completed).upload_document);
    }

    #[test]
    fn test_agent_completes_payment_only_at_payment_stage() {
        let payment = deal("PAYMENT", json!({ "paymentCompleted": false }));
        let caps = DealCapabilities::for_deal(UserRole::Agent, &payment);
        assert!(caps.complete_payment);
        assert!(caps.edit_stage);

        let agreement = deal("AGREEMENT", json!({}));
        assert!(!DealCapabilities::for_deal(UserRole::Agent, &agreement).complete_payment);

        let paid = deal("PAYMENT", json!({ "paymentCompleted": true }));
        assert!(!DealCapabilities::for_deal(UserRole::Agent, &paid).complete_payment);
    }

    #[test]
    fn test_stage_edit_form_hidden_once_completed() {
        let completed = deal("COMPLETED", json!({}));
        for role in [UserRole::Agent, UserRole::Admin] {
            let caps = DealCapabilities::for_deal(role, &completed);
            assert!(!caps.edit_stage);
            assert!(caps.view_timeline);
        }
    }

    #[test]
    fn test_role_table_gates_admin_screens_and_deal_creation() {
        assert!(role_capabilities(UserRole::Admin).admin_screens);
        assert!(!role_capabilities(UserRole::Agent).admin_screens);
        assert!(role_capabilities(UserRole::Agent).create_deal);
        assert!(!role_capabilities(UserRole::Admin).create_deal);
        assert!(!role_capabilities(UserRole::Buyer).create_deal);
        assert!(!role_capabilities(UserRole::Seller).view_actions);
    }
}
