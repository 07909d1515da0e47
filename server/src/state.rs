//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds one pooled HTTP client for Google/Firebase calls, the provider
//! configuration, and the in-memory session table.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::firebase::FirebaseConfig;
use crate::services::google::GoogleOAuthConfig;
use crate::services::session::SessionStore;

/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub firebase: Arc<FirebaseConfig>,
    /// `None` if Google OAuth env vars are not configured.
    pub google: Option<Arc<GoogleOAuthConfig>>,
    pub cookie_secure: bool,
    pub sessions: SessionStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            firebase: Arc::new(config.firebase),
            google: config.google.map(Arc::new),
            cookie_secure: config.cookie_secure,
            sessions: SessionStore::new(),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
