//! Deal lifecycle stages.
//!
//! A deal moves through a fixed, ordered set of stages from first inquiry to
//! completion. Stage order is semantically meaningful: it drives the progress
//! display, the set of forward transitions offered to agents, and the
//! presentation color of every deal card. All of that lives here so the stage
//! vocabulary exists in exactly one place.

use serde::{Deserialize, Serialize};

/// Presentation color for a stage value the backend sent that we don't know.
pub const UNKNOWN_STAGE_COLOR: &str = "#6b7280";

/// One step in the deal lifecycle.
///
/// Variant order is the canonical progression order; `Ord` follows it, so
/// `DealStage::Inquiry < DealStage::Completed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStage {
    #[default]
    Inquiry,
    Shortlist,
    Negotiation,
    Agreement,
    Registration,
    Payment,
    Completed,
}

impl DealStage {
    /// All stages in canonical progression order.
    pub const ALL: [Self; 7] = [
        Self::Inquiry,
        Self::Shortlist,
        Self::Negotiation,
        Self::Agreement,
        Self::Registration,
        Self::Payment,
        Self::Completed,
    ];

    /// Zero-based position in the canonical order.
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }

    /// Percentage of the lifecycle completed once this stage is reached.
    ///
    /// `(position + 1) / 7 * 100`, so `Inquiry` is ~14.3 and `Completed`
    /// is exactly 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn progress_percentage(self) -> f64 {
        ((self.position() + 1) as f64 / Self::ALL.len() as f64) * 100.0
    }

    /// The stages an agent may select as a transition target: the current
    /// stage and everything after it.
    ///
    /// Including the current stage allows a "no-op" update that records fresh
    /// notes and a visit date without advancing the deal.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // position() is always < ALL.len()
    pub fn next_options(self) -> &'static [Self] {
        &Self::ALL[self.position()..]
    }

    /// Whether the deal lifecycle has finished.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Presentation color (hex) for this stage.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Inquiry => "#3b82f6",
            Self::Shortlist => "#8b5cf6",
            Self::Negotiation => "#f59e0b",
            Self::Agreement => "#10b981",
            Self::Registration => "#06b6d4",
            Self::Payment => "#ec4899",
            Self::Completed => "#22c55e",
        }
    }

    /// Canonical uppercase name, matching the backend's wire value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inquiry => "INQUIRY",
            Self::Shortlist => "SHORTLIST",
            Self::Negotiation => "NEGOTIATION",
            Self::Agreement => "AGREEMENT",
            Self::Registration => "REGISTRATION",
            Self::Payment => "PAYMENT",
            Self::Completed => "COMPLETED",
        }
    }

    /// Timeline display label with the stage's marker emoji.
    #[must_use]
    pub const fn timeline_label(self) -> &'static str {
        match self {
            Self::Inquiry => "🔍 INQUIRY",
            Self::Shortlist => "⭐ SHORTLIST",
            Self::Negotiation => "💬 NEGOTIATION",
            Self::Agreement => "✅ AGREEMENT",
            Self::Registration => "📋 REGISTRATION",
            Self::Payment => "💰 PAYMENT",
            Self::Completed => "🎉 COMPLETED",
        }
    }

    /// Parse a backend stage string, `None` for anything unrecognized.
    ///
    /// Callers that must render unrecognized values treat them as position 0
    /// with [`UNKNOWN_STAGE_COLOR`] and the raw string as the label; that
    /// clamping is uniform across the app rather than per call site.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.name() == s)
    }

    /// Position for a raw backend stage string, clamped to 0 when unknown.
    #[must_use]
    pub fn position_for(s: &str) -> usize {
        Self::parse(s).map_or(0, Self::position)
    }

    /// Color for a raw backend stage string, neutral gray when unknown.
    #[must_use]
    pub fn color_for(s: &str) -> &'static str {
        Self::parse(s).map_or(UNKNOWN_STAGE_COLOR, Self::color)
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DealStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid deal stage: {s}"))
    }
}
