//! Core types for EstateHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod price;
pub mod role;
pub mod stage;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::{Price, format_inr, format_inr_compact};
pub use role::UserRole;
pub use stage::{DealStage, UNKNOWN_STAGE_COLOR};
