//! EstateHub backend API client implementation.
//!
//! JSON over REST with bearer-token auth, using `reqwest` 0.13. Reference
//! data (featured properties, areas, property types) is cached using `moka`
//! (5-minute TTL); everything else is fetched per request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use estatehub_core::{DealId, DealStage, PropertyId, UserId, UserRole};

use crate::config::BackendConfig;

use super::types::{
    AdminDashboard, AgentPerformance, AgentStats, AreaInfo, AuthPayload, CreateDealRequest, Deal,
    LoginRequest, Property, PropertyCreateRequest, PropertySearchRequest, PropertyTypeInfo,
    RegisterRequest, StageUpdateRequest, User, UserUpdateRequest,
};
use super::{BackendError, normalize_item, normalize_list};

/// Notes the backend records when a seller confirms a registration.
pub const SELLER_CONFIRM_NOTES: &str = "Seller confirmed - Documents received";

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the EstateHub backend REST API.
///
/// Provides typed access to properties, deals, users, and reference data.
/// Cheap to clone; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    api_url: String,
    cache: Cache<String, CacheValue>,
}

/// Cached reference-data responses, keyed by formatted strings
/// (`"properties:featured"`, `"areas:{city}"`, `"property-types:all"`).
#[derive(Clone)]
enum CacheValue {
    Featured(Arc<Vec<Property>>),
    Areas(Arc<Vec<AreaInfo>>),
    PropertyTypes(Arc<Vec<PropertyTypeInfo>>),
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.clone(),
                cache,
            }),
        }
    }

    /// Execute a request and return the decoded JSON body.
    async fn request<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<Value, BackendError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.inner.api_url);

        let mut request = self.inner.client.request(method, &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(path.to_string()));
        }

        // Get the response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            // 4xx bodies usually carry a user-facing envelope message
            if status.is_client_error()
                && let Ok(value) = serde_json::from_str::<Value>(&response_text)
                && let Some(message) = value.get("message").and_then(Value::as_str)
            {
                return Err(BackendError::Rejected(message.to_string()));
            }
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend API returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(BackendError::Parse(e))
            }
        }
    }

    async fn get(&self, path: &str, token: Option<&str>) -> Result<Value, BackendError> {
        self.request::<()>(Method::GET, path, token, None).await
    }

    async fn post<B>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<Value, BackendError>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, token, Some(body)).await
    }

    async fn post_empty(&self, path: &str, token: Option<&str>) -> Result<Value, BackendError> {
        self.request::<()>(Method::POST, path, token, None).await
    }

    async fn put<B>(&self, path: &str, token: Option<&str>, body: &B) -> Result<Value, BackendError>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    async fn delete(&self, path: &str, token: Option<&str>) -> Result<Value, BackendError> {
        self.request::<()>(Method::DELETE, path, token, None).await
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in with username and password, returning the issued token and
    /// account.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] for bad credentials, or
    /// [`BackendError::Rejected`] if the backend answers 200 without a token.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, BackendError> {
        let value = self.post("/api/auth/login", None, request).await?;
        normalize_item(value).ok_or_else(|| BackendError::Rejected("Login failed".to_string()))
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] with the backend's message when the
    /// account is declined (e.g. a duplicate username).
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), BackendError> {
        let value = self.post("/api/auth/register", None, request).await?;
        check_envelope(&value)
    }

    // =========================================================================
    // Property Methods
    // =========================================================================

    /// Featured property listings for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_properties(&self) -> Result<Arc<Vec<Property>>, BackendError> {
        let cache_key = "properties:featured".to_string();

        // Check cache
        if let Some(CacheValue::Featured(properties)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for featured properties");
            return Ok(properties);
        }

        let value = self.get("/api/properties/featured", None).await?;
        let properties: Arc<Vec<Property>> = Arc::new(normalize_list(value));

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Featured(Arc::clone(&properties)))
            .await;

        Ok(properties)
    }

    /// Get a single property listing by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the property does not exist or the request fails.
    #[instrument(skip(self), fields(property_id = %property_id))]
    pub async fn property(&self, property_id: PropertyId) -> Result<Property, BackendError> {
        let value = self
            .get(&format!("/api/properties/{property_id}"), None)
            .await?;
        normalize_item(value)
            .ok_or_else(|| BackendError::NotFound(format!("Property not found: {property_id}")))
    }

    /// Search property listings with the given filters (never cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request))]
    pub async fn search_properties(
        &self,
        request: &PropertySearchRequest,
    ) -> Result<Vec<Property>, BackendError> {
        let value = self.post("/api/properties/search", None, request).await?;
        Ok(normalize_list(value))
    }

    /// Listings owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn properties_by_user(
        &self,
        user_id: UserId,
        token: &str,
    ) -> Result<Vec<Property>, BackendError> {
        let value = self
            .get(&format!("/api/properties/user/{user_id}"), Some(token))
            .await?;
        Ok(normalize_list(value))
    }

    /// Create a new property listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing is declined or the request fails.
    #[instrument(skip(self, request, token))]
    pub async fn create_property(
        &self,
        request: &PropertyCreateRequest,
        token: &str,
    ) -> Result<(), BackendError> {
        let value = self.post("/api/properties", Some(token), request).await?;
        check_envelope(&value)
    }

    /// Localities for a city, cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn areas(&self, city: &str) -> Result<Arc<Vec<AreaInfo>>, BackendError> {
        let cache_key = format!("areas:{}", city.to_lowercase());

        // Check cache
        if let Some(CacheValue::Areas(areas)) = self.inner.cache.get(&cache_key).await {
            debug!(%city, "Cache hit for areas");
            return Ok(areas);
        }

        let path = format!("/api/areas?city={}", urlencoding::encode(city));
        let value = self.get(&path, None).await?;
        let areas: Arc<Vec<AreaInfo>> = Arc::new(normalize_list(value));

        self.inner
            .cache
            .insert(cache_key, CacheValue::Areas(Arc::clone(&areas)))
            .await;

        Ok(areas)
    }

    /// Property categories (Flat, Villa, ...), cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn property_types(&self) -> Result<Arc<Vec<PropertyTypeInfo>>, BackendError> {
        let cache_key = "property-types:all".to_string();

        // Check cache
        if let Some(CacheValue::PropertyTypes(types)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for property types");
            return Ok(types);
        }

        let value = self.get("/api/property-types", None).await?;
        let types: Arc<Vec<PropertyTypeInfo>> = Arc::new(normalize_list(value));

        self.inner
            .cache
            .insert(cache_key, CacheValue::PropertyTypes(Arc::clone(&types)))
            .await;

        Ok(types)
    }

    /// Readiness probe: hit a cheap endpoint, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), BackendError> {
        self.get("/api/property-types", None).await.map(|_| ())
    }

    // =========================================================================
    // Deal Methods
    // =========================================================================

    /// Deals where the given user is the buyer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(buyer_id = %buyer_id))]
    pub async fn deals_by_buyer(
        &self,
        buyer_id: UserId,
        token: &str,
    ) -> Result<Vec<Deal>, BackendError> {
        let value = self
            .get(&format!("/api/deals/buyer/{buyer_id}"), Some(token))
            .await?;
        Ok(normalize_list(value))
    }

    /// Deals managed by the given agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(agent_id = %agent_id))]
    pub async fn deals_by_agent(
        &self,
        agent_id: UserId,
        token: &str,
    ) -> Result<Vec<Deal>, BackendError> {
        let value = self
            .get(&format!("/api/deals/agent/{agent_id}"), Some(token))
            .await?;
        Ok(normalize_list(value))
    }

    /// Deals attached to the given property.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(property_id = %property_id))]
    pub async fn deals_by_property(
        &self,
        property_id: PropertyId,
        token: &str,
    ) -> Result<Vec<Deal>, BackendError> {
        let value = self
            .get(&format!("/api/deals/property/{property_id}"), Some(token))
            .await?;
        Ok(normalize_list(value))
    }

    /// Role-scoped deal list (sellers see deals on their listings).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn my_deals(
        &self,
        role: UserRole,
        user_id: UserId,
        token: &str,
    ) -> Result<Vec<Deal>, BackendError> {
        let path = format!("/api/deals/my-deals?userRole={role}&userId={user_id}");
        let value = self.get(&path, Some(token)).await?;
        Ok(normalize_list(value))
    }

    /// All deals currently in the given stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn deals_by_stage(
        &self,
        stage: DealStage,
        token: &str,
    ) -> Result<Vec<Deal>, BackendError> {
        let value = self
            .get(&format!("/api/deals/stage/{stage}"), Some(token))
            .await?;
        Ok(normalize_list(value))
    }

    /// Deal lists for all seven stages, fetched serially in canonical order.
    ///
    /// A failed stage fetch logs a warning and contributes an empty list so
    /// the remaining stages still render.
    #[instrument(skip(self, token))]
    pub async fn all_deals_by_stage(&self, token: &str) -> Vec<(DealStage, Vec<Deal>)> {
        let mut grouped = Vec::with_capacity(DealStage::ALL.len());
        for &stage in &DealStage::ALL {
            match self.deals_by_stage(stage, token).await {
                Ok(deals) => grouped.push((stage, deals)),
                Err(err) => {
                    warn!(%stage, error = %err, "Failed to fetch deals for stage");
                    grouped.push((stage, Vec::new()));
                }
            }
        }
        grouped
    }

    /// Move a deal to a new stage with notes and an effective date.
    ///
    /// Returns the updated deal when the backend echoes one back.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is declined or the request fails.
    #[instrument(skip(self, request, token), fields(deal_id = %deal_id, stage = %request.stage))]
    pub async fn update_stage(
        &self,
        deal_id: DealId,
        request: &StageUpdateRequest,
        token: &str,
    ) -> Result<Option<Deal>, BackendError> {
        let value = self
            .put(&format!("/api/deals/{deal_id}/stage"), Some(token), request)
            .await?;
        check_envelope(&value)?;
        Ok(normalize_item(value))
    }

    /// Seller confirmation at the REGISTRATION stage (one-way flip of
    /// `sellerConfirmed`, with fixed notes).
    ///
    /// # Errors
    ///
    /// Returns an error if the confirmation is declined or the request fails.
    #[instrument(skip(self, token), fields(deal_id = %deal_id))]
    pub async fn seller_confirm(&self, deal_id: DealId, token: &str) -> Result<(), BackendError> {
        let value = self
            .post(
                &format!("/api/deals/{deal_id}/seller-confirm"),
                Some(token),
                &json!({ "notes": SELLER_CONFIRM_NOTES }),
            )
            .await?;
        check_envelope(&value)
    }

    /// Mark a deal's payment as completed (one-way flip of
    /// `paymentCompleted`).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend declines or the request fails.
    #[instrument(skip(self, token), fields(deal_id = %deal_id))]
    pub async fn complete_payment(&self, deal_id: DealId, token: &str) -> Result<(), BackendError> {
        let value = self
            .post_empty(&format!("/api/deals/{deal_id}/complete-payment"), Some(token))
            .await?;
        check_envelope(&value)
    }

    /// Attach a buyer document URL to a deal (flips `buyerDocUploaded`).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend declines or the request fails.
    #[instrument(skip(self, doc_url, token), fields(deal_id = %deal_id))]
    pub async fn upload_document(
        &self,
        deal_id: DealId,
        doc_url: &str,
        token: &str,
    ) -> Result<(), BackendError> {
        let value = self
            .post(
                &format!("/api/deals/{deal_id}/upload-document"),
                Some(token),
                &json!({ "docUrl": doc_url }),
            )
            .await?;
        check_envelope(&value)
    }

    /// Open a new deal (agents only).
    ///
    /// # Errors
    ///
    /// Returns an error if the deal is declined or the request fails.
    #[instrument(skip(self, request, token))]
    pub async fn create_deal(
        &self,
        request: &CreateDealRequest,
        token: &str,
    ) -> Result<(), BackendError> {
        let value = self.post("/api/deals/create", Some(token), request).await?;
        check_envelope(&value)
    }

    /// Aggregate deal statistics for the admin dashboard.
    ///
    /// A malformed body degrades to zeroed aggregates rather than failing the
    /// whole page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_dashboard(&self, token: &str) -> Result<AdminDashboard, BackendError> {
        let value = self.get("/api/deals/admin/dashboard", Some(token)).await?;
        Ok(normalize_item(value).unwrap_or_default())
    }

    /// All deals managed by one agent, for the admin agent drill-down.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(agent_id = %agent_id))]
    pub async fn admin_agent_deals(
        &self,
        agent_id: UserId,
        token: &str,
    ) -> Result<Vec<Deal>, BackendError> {
        let value = self
            .get(&format!("/api/deals/admin/agent/{agent_id}"), Some(token))
            .await?;
        Ok(normalize_list(value))
    }

    /// Per-agent performance aggregates for the admin roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn agents_performance(
        &self,
        token: &str,
    ) -> Result<Vec<AgentPerformance>, BackendError> {
        let value = self
            .get("/api/deals/admin/agents-performance", Some(token))
            .await?;
        Ok(normalize_list(value))
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// All registered users (admin roster).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn users(&self, token: &str) -> Result<Vec<User>, BackendError> {
        let value = self.get("/api/users", Some(token)).await?;
        Ok(normalize_list(value))
    }

    /// All users with the AGENT role.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn agents(&self, token: &str) -> Result<Vec<User>, BackendError> {
        let value = self.get("/api/users/agents", Some(token)).await?;
        Ok(normalize_list(value))
    }

    /// Look up a user by phone number (buyer lookup during deal creation).
    ///
    /// Returns `Ok(None)` when no account matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, phone, token))]
    pub async fn search_user_by_phone(
        &self,
        phone: &str,
        token: &str,
    ) -> Result<Option<User>, BackendError> {
        let path = format!("/api/users/search?phone={}", urlencoding::encode(phone));
        let value = match self.get(&path, Some(token)).await {
            Ok(value) => value,
            Err(BackendError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(normalize_item(value))
    }

    /// Update a user's profile or role.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is declined or the request fails.
    #[instrument(skip(self, request, token), fields(user_id = %user_id))]
    pub async fn update_user(
        &self,
        user_id: UserId,
        request: &UserUpdateRequest,
        token: &str,
    ) -> Result<(), BackendError> {
        let value = self
            .put(&format!("/api/users/{user_id}"), Some(token), request)
            .await?;
        check_envelope(&value)
    }

    /// Delete a user account (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion is declined or the request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn delete_user(&self, user_id: UserId, token: &str) -> Result<(), BackendError> {
        let value = self.delete(&format!("/api/users/{user_id}"), Some(token)).await?;
        check_envelope(&value)
    }

    // =========================================================================
    // Agent Methods
    // =========================================================================

    /// Personal statistics for the agent dashboard.
    ///
    /// A malformed body degrades to zeroed statistics rather than failing the
    /// whole page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(agent_id = %agent_id))]
    pub async fn agent_stats(
        &self,
        agent_id: UserId,
        token: &str,
    ) -> Result<AgentStats, BackendError> {
        let value = self
            .get(&format!("/api/agents/{agent_id}/stats"), Some(token))
            .await?;
        Ok(normalize_item(value).unwrap_or_default())
    }

    /// Every listing an agent has a deal on.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(agent_id = %agent_id))]
    pub async fn agent_properties(
        &self,
        agent_id: UserId,
        token: &str,
    ) -> Result<Vec<Property>, BackendError> {
        let value = self
            .get(&format!("/api/agents/{agent_id}/all-properties"), Some(token))
            .await?;
        Ok(normalize_list(value))
    }
}

/// Reject command responses that answer 200 with `{"success": false}`.
fn check_envelope(value: &Value) -> Result<(), BackendError> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Request rejected by the backend")
            .to_string();
        return Err(BackendError::Rejected(message));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_check_envelope_passes_success_and_bare_bodies() {
        assert!(check_envelope(&json!({ "success": true, "data": [] })).is_ok());
        assert!(check_envelope(&json!({ "id": 1 })).is_ok());
        assert!(check_envelope(&json!([1, 2, 3])).is_ok());
    }

    #[test]
    fn test_check_envelope_rejects_with_backend_message() {
        let err = check_envelope(&json!({
            "success": false,
            "message": "Username already exists"
        }))
        .unwrap_err();
        assert!(matches!(err, BackendError::Rejected(m) if m == "Username already exists"));
    }

    #[test]
    fn test_check_envelope_rejects_without_message() {
        let err = check_envelope(&json!({ "success": false })).unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));
    }
}
