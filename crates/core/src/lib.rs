//! EstateHub Core - Shared types library.
//!
//! This crate provides common types used across all EstateHub components:
//! - `web` - Server-rendered marketplace site
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Deal stages, user roles, type-safe IDs, phone numbers, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
