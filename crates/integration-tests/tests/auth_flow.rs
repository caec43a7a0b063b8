//! Integration tests for authentication and access control.
//!
//! These tests require:
//! - The web server running (cargo run -p estatehub-web)
//! - Tests marked "and backend API" additionally need the EstateHub backend
//!
//! Run with: cargo test -p estatehub-integration-tests -- --ignored

use estatehub_integration_tests::{base_url, client, location_of, no_redirect_client};
use reqwest::StatusCode;
use uuid::Uuid;

// ============================================================================
// Page Rendering
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_login_page_renders() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/auth/login"))
        .send()
        .await
        .expect("Failed to get login page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("action=\"/auth/login\""));
    assert!(body.contains("name=\"username\""));
    assert!(body.contains("name=\"password\""));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_register_page_renders() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/auth/register"))
        .send()
        .await
        .expect("Failed to get register page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("action=\"/auth/register\""));
    // Self-service roles only; nobody registers as an admin
    assert!(body.contains("BUYER"));
    assert!(!body.contains("value=\"ADMIN\""));
}

// ============================================================================
// Access Control
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_anonymous_dashboard_redirects_to_login() {
    let client = no_redirect_client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/dashboard"))
        .send()
        .await
        .expect("Failed to get dashboard");

    assert!(resp.status().is_redirection());
    assert_eq!(location_of(&resp), "/auth/login");
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_anonymous_deal_pages_redirect_to_login() {
    let client = no_redirect_client();
    let base_url = base_url();

    for path in ["/my-deals", "/buyer-deals", "/seller-deals", "/deals/1"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to request deal page");

        assert!(
            resp.status().is_redirection(),
            "Expected redirect for {path}, got {}",
            resp.status()
        );
        assert_eq!(location_of(&resp), "/auth/login");
    }
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_anonymous_admin_pages_redirect_to_login() {
    let client = no_redirect_client();
    let base_url = base_url();

    for path in ["/admin-deals", "/admin-agents", "/admin-users"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to request admin page");

        assert!(
            resp.status().is_redirection(),
            "Expected redirect for {path}, got {}",
            resp.status()
        );
        assert_eq!(location_of(&resp), "/auth/login");
    }
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_anonymous_agent_dashboard_redirects_to_login() {
    let client = no_redirect_client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/agent-dashboard"))
        .send()
        .await
        .expect("Failed to get agent dashboard");

    assert!(resp.status().is_redirection());
    assert_eq!(location_of(&resp), "/auth/login");
}

// ============================================================================
// Login / Registration
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server and backend API"]
async fn test_login_rejects_bad_credentials() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("username", "no-such-user"), ("password", "wrong-password")])
        .send()
        .await
        .expect("Failed to post login");

    // Lands back on the login page with an error banner
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/auth/login");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("banner-error"));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_login_requires_username_and_password() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("username", ""), ("password", "")])
        .send()
        .await
        .expect("Failed to post empty login");

    // Rejected before any backend call is made
    assert_eq!(resp.url().path(), "/auth/login");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("banner-error"));
}

#[tokio::test]
#[ignore = "Requires running web server and backend API"]
async fn test_register_login_logout_roundtrip() {
    let client = client();
    let base_url = base_url();

    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("it-buyer-{suffix}");
    let email = format!("{username}@example.com");

    // Register a fresh buyer; success bounces to the login page
    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("first_name", "Integration"),
            ("last_name", "Test"),
            ("username", &username),
            ("email", &email),
            ("mobile", "9000011111"),
            ("role", "BUYER"),
            ("password", "test-password-1"),
            ("confirm_password", "test-password-1"),
        ])
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.url().path(), "/auth/login");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Account created"));

    // Sign in; /dashboard dispatches a buyer to the buyer deals page
    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[
            ("username", username.as_str()),
            ("password", "test-password-1"),
        ])
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.url().path(), "/buyer-deals");

    // The session cookie now grants access to protected pages
    let resp = client
        .get(format!("{base_url}/dashboard"))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/buyer-deals");

    // Log out and verify the session is gone
    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert!(resp.status().is_success() || resp.status().is_redirection());

    let resp = client
        .get(format!("{base_url}/dashboard"))
        .send()
        .await
        .expect("Failed to get dashboard after logout");
    assert_eq!(resp.url().path(), "/auth/login");
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_register_rejects_password_mismatch() {
    let client = client();
    let base_url = base_url();

    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("it-mismatch-{suffix}");
    let email = format!("{username}@example.com");

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("first_name", "Integration"),
            ("last_name", "Test"),
            ("username", &username),
            ("email", &email),
            ("mobile", "9000022222"),
            ("role", "BUYER"),
            ("password", "test-password-1"),
            ("confirm_password", "different-password"),
        ])
        .send()
        .await
        .expect("Failed to post register");

    // Validation fails locally and re-renders the form with an error
    assert_eq!(resp.url().path(), "/auth/register");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("banner-error"));
}
