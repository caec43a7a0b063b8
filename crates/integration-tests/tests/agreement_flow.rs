//! Integration tests for the rental agreement generator.
//!
//! Agreements live in the visitor's session, so these tests only require
//! the web server running (cargo run -p estatehub-web). No backend API
//! and no login are involved.
//!
//! Run with: cargo test -p estatehub-integration-tests -- --ignored

use estatehub_integration_tests::{base_url, client};
use reqwest::StatusCode;

// ============================================================================
// Page Rendering
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_generator_page_renders() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/rental-agreement"))
        .send()
        .await
        .expect("Failed to get generator page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Rental Agreement Generator"));
    assert!(body.contains("name=\"landlord_name\""));
    assert!(body.contains("name=\"monthly_rent\""));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_agreement_list_empty_for_new_visitor() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/my-agreements"))
        .send()
        .await
        .expect("Failed to get agreements list");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    // Fresh session, nothing generated yet
    assert!(!body.contains("agreement-doc"));
}

// ============================================================================
// Generate & List
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_generate_and_list_agreement() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/rental-agreement"))
        .form(&[
            ("landlord_name", "Suresh Varma"),
            ("tenant_name", "Divya Nair"),
            ("property_address", "Flat 402, Sai Residency, Kondapur"),
            ("city", "Hyderabad"),
            ("monthly_rent", "25000"),
            ("security_deposit", "50000"),
            ("duration_months", "11"),
            ("start_date", "2026-09-01"),
        ])
        .send()
        .await
        .expect("Failed to generate agreement");

    // Lands on the list page with the fresh agreement
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/my-agreements");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Agreement generated."));
    assert!(body.contains("Suresh Varma"));
    assert!(body.contains("Divya Nair"));
    // An 11 month term stays a rental agreement
    assert!(body.contains("Rental Agreement"));

    // The agreement persists in the session
    let resp = client
        .get(format!("{base_url}/my-agreements"))
        .send()
        .await
        .expect("Failed to list agreements");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Suresh Varma"));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_long_lease_labelled_as_lease_agreement() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/rental-agreement"))
        .form(&[
            ("landlord_name", "Meena Reddy"),
            ("tenant_name", "Arjun Rao"),
            ("property_address", "Villa 7, Palm Meadows, Kompally"),
            ("city", "Hyderabad"),
            ("monthly_rent", "40000"),
            ("security_deposit", "120000"),
            ("duration_months", "24"),
            ("start_date", "2026-10-01"),
        ])
        .send()
        .await
        .expect("Failed to generate agreement");

    assert_eq!(resp.url().path(), "/my-agreements");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Lease Agreement"));
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_generate_rejects_missing_fields() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/rental-agreement"))
        .form(&[
            ("landlord_name", ""),
            ("tenant_name", "Divya Nair"),
            ("property_address", ""),
            ("city", "Hyderabad"),
            ("monthly_rent", "25000"),
            ("security_deposit", "50000"),
            ("duration_months", "11"),
            ("start_date", "2026-09-01"),
        ])
        .send()
        .await
        .expect("Failed to post incomplete form");

    // Bounced back to the generator with an error banner
    assert_eq!(resp.url().path(), "/rental-agreement");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("banner-error"));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_generate_rejects_zero_rent() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/rental-agreement"))
        .form(&[
            ("landlord_name", "Suresh Varma"),
            ("tenant_name", "Divya Nair"),
            ("property_address", "Flat 402, Sai Residency, Kondapur"),
            ("city", "Hyderabad"),
            ("monthly_rent", "0"),
            ("security_deposit", "50000"),
            ("duration_months", "11"),
            ("start_date", "2026-09-01"),
        ])
        .send()
        .await
        .expect("Failed to post zero rent form");

    assert_eq!(resp.url().path(), "/rental-agreement");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("banner-error"));
}
