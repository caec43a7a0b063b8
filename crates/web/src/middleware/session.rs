//! Session middleware configuration.
//!
//! Sets up signed-cookie sessions backed by an in-process store. Session
//! contents (login identity, generated rental agreements) are intentionally
//! ephemeral and do not survive a restart.

use secrecy::ExposeSecret;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "eh_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-process store and signed cookies.
///
/// # Panics
///
/// Panics if the session secret is shorter than the signing key requires;
/// config validation rejects such secrets before this runs.
#[must_use]
pub fn create_session_layer(config: &WebConfig) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    let store = MemoryStore::default();

    // Cookie signing key, derived from the configured secret
    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    // Secure cookies only when actually served over HTTPS
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
