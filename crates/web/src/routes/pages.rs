//! Dashboard landing and static marketing pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::Redirect;

use estatehub_core::UserRole;

use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::session::CurrentUser;

// =============================================================================
// Templates
// =============================================================================

/// Owner plans page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/owner_plans.html")]
pub struct OwnerPlansTemplate {
    pub user: Option<CurrentUser>,
    pub plans: Vec<OwnerPlan>,
}

/// Home renovation page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home_renovation.html")]
pub struct HomeRenovationTemplate {
    pub user: Option<CurrentUser>,
    pub services: Vec<RenovationService>,
}

/// One owner subscription tier.
pub struct OwnerPlan {
    pub name: &'static str,
    pub price: &'static str,
    pub tagline: &'static str,
    pub features: Vec<&'static str>,
    /// Rendered with the highlighted card style.
    pub featured: bool,
}

/// One renovation service card.
pub struct RenovationService {
    pub emoji: &'static str,
    pub name: &'static str,
    pub blurb: &'static str,
}

// =============================================================================
// Static Data
// =============================================================================

fn owner_plan_tiers() -> Vec<OwnerPlan> {
    vec![
        OwnerPlan {
            name: "Basic",
            price: "Free",
            tagline: "List your first property at no cost",
            features: vec![
                "1 active listing",
                "Photo gallery",
                "Buyer inquiries by phone",
            ],
            featured: false,
        },
        OwnerPlan {
            name: "Relax",
            price: "₹1,999",
            tagline: "We handle the calls, you handle the keys",
            features: vec![
                "5 active listings",
                "Featured placement on the home page",
                "Dedicated relationship manager",
                "Photoshoot of your property",
            ],
            featured: true,
        },
        OwnerPlan {
            name: "Super Money Back",
            price: "₹4,999",
            tagline: "Sold in 90 days or your money back",
            features: vec![
                "Unlimited active listings",
                "Top slot in search results",
                "Dedicated relationship manager",
                "Professional photoshoot and video tour",
                "Full refund if unsold in 90 days",
            ],
            featured: false,
        },
    ]
}

fn renovation_services() -> Vec<RenovationService> {
    vec![
        RenovationService {
            emoji: "🎨",
            name: "Painting",
            blurb: "Interior and exterior painting with branded paints and a 1-year warranty.",
        },
        RenovationService {
            emoji: "🔧",
            name: "Plumbing",
            blurb: "Leak fixes, bathroom fittings, and full pipeline replacement.",
        },
        RenovationService {
            emoji: "🍳",
            name: "Modular Kitchen",
            blurb: "Design, materials, and installation handled end to end.",
        },
        RenovationService {
            emoji: "🛁",
            name: "Bathroom Remodelling",
            blurb: "Waterproofing, tiling, and sanitaryware upgrades.",
        },
        RenovationService {
            emoji: "🪵",
            name: "Flooring",
            blurb: "Tiles, wooden flooring, and marble polishing.",
        },
        RenovationService {
            emoji: "💡",
            name: "Electrical",
            blurb: "Rewiring, smart switches, and safety inspections.",
        },
    ]
}

// =============================================================================
// Handlers
// =============================================================================

/// Post-login landing: each role goes straight to the screen it works from.
pub async fn dashboard(RequireAuth(user): RequireAuth) -> Redirect {
    let destination = match user.role {
        UserRole::Buyer => "/buyer-deals",
        UserRole::Seller => "/my-properties",
        UserRole::Agent => "/agent-dashboard",
        UserRole::Admin => "/admin-deals",
    };
    Redirect::to(destination)
}

/// Display the owner subscription plans.
pub async fn owner_plans(OptionalAuth(user): OptionalAuth) -> OwnerPlansTemplate {
    OwnerPlansTemplate {
        user,
        plans: owner_plan_tiers(),
    }
}

/// Display the home renovation services page.
pub async fn home_renovation(OptionalAuth(user): OptionalAuth) -> HomeRenovationTemplate {
    HomeRenovationTemplate {
        user,
        services: renovation_services(),
    }
}
