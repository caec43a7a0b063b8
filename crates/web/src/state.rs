//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::WebConfig;
use crate::services::AssetClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    backend: BackendClient,
    assets: Option<AssetClient>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: WebConfig) -> Self {
        let backend = BackendClient::new(&config.backend);
        let assets = config.assets.as_ref().map(AssetClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                assets,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the asset host client, if uploads are configured.
    #[must_use]
    pub fn assets(&self) -> Option<&AssetClient> {
        self.inner.assets.as_ref()
    }
}
