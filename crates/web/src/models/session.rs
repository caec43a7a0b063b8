//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use estatehub_core::{UserId, UserRole};

use crate::models::capabilities::{role_capabilities, RoleCapabilities};

/// Session-stored user identity.
///
/// Everything a request handler needs without a backend round-trip: who the
/// user is, what they may do, and the bearer token for authorized calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Name shown in the header and greetings.
    pub display_name: String,
    /// Marketplace role.
    pub role: UserRole,
    /// Bearer token issued at login, replayed on authorized backend calls.
    pub token: String,
}

impl CurrentUser {
    /// Role-level capability table, used by templates to gate navigation.
    #[must_use]
    pub const fn capabilities(&self) -> RoleCapabilities {
        role_capabilities(self.role)
    }

    #[must_use]
    pub fn is_buyer(&self) -> bool {
        matches!(self.role, UserRole::Buyer)
    }

    #[must_use]
    pub fn is_seller(&self) -> bool {
        matches!(self.role, UserRole::Seller)
    }

    #[must_use]
    pub fn is_agent(&self) -> bool {
        matches!(self.role, UserRole::Agent)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

/// Session keys for authentication and client-only data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the visitor's generated rental agreements.
    pub const RENTAL_AGREEMENTS: &str = "rental_agreements";
}
