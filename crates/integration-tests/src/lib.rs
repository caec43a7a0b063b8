//! Integration tests for EstateHub.
//!
//! The tests in `tests/` drive a running `estatehub-web` server over plain
//! HTTP. They are all `#[ignore]`d by default because they need external
//! processes:
//!
//! - The web server: `cargo run -p estatehub-web`
//! - For tests marked "and backend API", the marketplace backend reachable
//!   at the URL the server was configured with (`ESTATEHUB_API_URL`)
//!
//! Run with: `cargo test -p estatehub-integration-tests -- --ignored`
//!
//! # Test Categories
//!
//! - `site_pages` - Public page rendering and health probes
//! - `auth_flow` - Login/registration and access control redirects
//! - `agreement_flow` - Session-backed rental agreement generator

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::{Client, redirect::Policy};

/// Base URL for the web front end (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("ESTATEHUB_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client with a cookie store so the session survives across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// HTTP client that does not follow redirects, for asserting on the
/// redirect responses themselves.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` header of a redirect response, as a string.
///
/// # Panics
///
/// Panics if the response has no `Location` header.
#[must_use]
pub fn location_of(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
        .expect("Response has no Location header")
}
