//! Marketplace backend API client.
//!
//! # Architecture
//!
//! - Plain REST over JSON - the backend is the source of truth, NO local sync
//! - Bearer token auth: the token issued at login is carried in the session
//!   and attached per request
//! - In-memory caching via `moka` for reference data (5 minute TTL)
//!
//! # Response envelopes
//!
//! The backend is inconsistent about response shapes. List endpoints variously
//! return a bare JSON array, `{"success": true, "data": [...]}`, or
//! `{"data": [...]}`. All responses pass through [`normalize_list`] /
//! [`normalize_item`] at this boundary; route handlers only ever see decoded
//! DTOs and never raw envelopes.
//!
//! # Example
//!
//! ```rust,ignore
//! use estatehub_web::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend);
//!
//! // Log in and use the issued token for authenticated calls
//! let auth = client.login("ravi", "secret123").await?;
//! let deals = client.my_deals(&auth.token).await?;
//! ```

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::*;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when interacting with the marketplace backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend declined the request with a user-facing message
    /// (a `{"success": false, "message": ...}` body on a 4xx status).
    #[error("{0}")]
    Rejected(String),

    /// Token missing, expired, or rejected by the backend.
    #[error("Unauthorized")]
    Unauthorized,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Decode a list response, whatever envelope the backend wrapped it in.
///
/// Accepts a bare array, `{"success": true, "data": [...]}`, or
/// `{"data": [...]}`. An explicit `"success": false`, a missing or non-array
/// `data` field, or any other shape decodes to an empty list. Elements that
/// fail to deserialize are skipped with a warning rather than poisoning the
/// whole response.
#[must_use]
pub fn normalize_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(ref map) => {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                return Vec::new();
            }
            match map.get("data") {
                Some(Value::Array(items)) => items.clone(),
                _ => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable list element");
                None
            }
        })
        .collect()
}

/// Decode a single-object response, whatever envelope the backend wrapped it in.
///
/// Accepts `{"success": true, "data": {...}}`, `{"data": {...}}`, or a bare
/// object. Returns `None` for `"success": false` or undecodable payloads.
#[must_use]
pub fn normalize_item<T: DeserializeOwned>(value: Value) -> Option<T> {
    let payload = match value {
        Value::Object(ref map) => {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                return None;
            }
            match map.get("data") {
                Some(data) if !data.is_null() => data.clone(),
                _ => value,
            }
        }
        other => other,
    };

    match serde_json::from_value::<T>(payload) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(error = %e, "Undecodable response payload");
            None
        }
    }
}
