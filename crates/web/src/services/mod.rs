//! External service clients for the web crate.
//!
//! # Services
//!
//! - `assets` - Unsigned uploads to the configured asset host (property
//!   photos, deal documents)

pub mod assets;

pub use assets::{AssetClient, AssetError};
