//! Domain models for the web crate.
//!
//! # Modules
//!
//! - `session` - Session-stored identity and typed session keys
//! - `capabilities` - Role-capability table driving the deal screens
//! - `agreement` - Session-persisted rental agreements

pub mod agreement;
pub mod capabilities;
pub mod session;
