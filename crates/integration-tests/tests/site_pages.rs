//! Integration tests for public pages and health probes.
//!
//! These tests require:
//! - The web server running (cargo run -p estatehub-web)
//! - Tests marked "and backend API" additionally need the EstateHub backend
//!
//! Run with: cargo test -p estatehub-integration-tests -- --ignored

use estatehub_integration_tests::{base_url, client};
use reqwest::StatusCode;

// ============================================================================
// Health Probes
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_liveness_probe() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach /health");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert_eq!(body, "ok");
}

#[tokio::test]
#[ignore = "Requires running web server and backend API"]
async fn test_readiness_probe() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach /health/ready");

    // 200 when the backend answers its ping, 503 when it does not
    assert!(
        resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE,
        "Unexpected readiness status: {}",
        resp.status()
    );
}

// ============================================================================
// Browse Pages
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server and backend API"]
async fn test_home_page_renders() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to get home page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Find Your Dream Home in Hyderabad"));
    assert!(body.contains("Popular Localities"));
    // The search form posts back to /search
    assert!(body.contains("action=\"/search\""));
}

#[tokio::test]
#[ignore = "Requires running web server and backend API"]
async fn test_search_with_filters() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!(
            "{base_url}/search?listingType=sale&minPrice=5000000&minBedrooms=2"
        ))
        .send()
        .await
        .expect("Failed to search");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("properties found"));
}

#[tokio::test]
#[ignore = "Requires running web server and backend API"]
async fn test_search_tolerates_blank_filter_values() {
    let client = client();
    let base_url = base_url();

    // An untouched filter form submits every field as an empty string
    let resp = client
        .get(format!(
            "{base_url}/search?listingType=&propertyType=&area=&minPrice=&maxPrice=&minBedrooms="
        ))
        .send()
        .await
        .expect("Failed to search with blank filters");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running web server and backend API"]
async fn test_property_type_browse_page() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/property-type/sale/Flat"))
        .send()
        .await
        .expect("Failed to browse by property type");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Flat"));
}

#[tokio::test]
#[ignore = "Requires running web server and backend API"]
async fn test_area_browse_page() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/area/Gachibowli"))
        .send()
        .await
        .expect("Failed to browse by area");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Gachibowli"));
}

// ============================================================================
// Static Pages
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_owner_plans_page() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/owner-plans"))
        .send()
        .await
        .expect("Failed to get owner plans");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("plan"));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_home_renovation_page() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/home-renovation"))
        .send()
        .await
        .expect("Failed to get home renovation page");

    assert_eq!(resp.status(), StatusCode::OK);
}
