//! User roles.

use serde::{Deserialize, Serialize};

/// Role of a marketplace user.
///
/// The backend serializes buyer accounts as either `BUYER` or the legacy
/// `USER` value; both deserialize to [`UserRole::Buyer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Looks for properties; party to deals the agent creates for them.
    #[serde(alias = "USER")]
    Buyer,
    /// Owns listed properties; confirms registration on their deals.
    Seller,
    /// Creates deals and advances them through the lifecycle.
    Agent,
    /// Back-office oversight of all deals, agents, and users.
    Admin,
}

impl UserRole {
    /// Human-readable name for display.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::Seller => "Seller",
            Self::Agent => "Agent",
            Self::Admin => "Admin",
        }
    }

    /// Canonical uppercase name, matching the backend's wire value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Seller => "SELLER",
            Self::Agent => "AGENT",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUYER" | "USER" => Ok(Self::Buyer),
            "SELLER" => Ok(Self::Seller),
            "AGENT" => Ok(Self::Agent),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}
