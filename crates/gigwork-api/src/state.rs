//! Application state.

use std::sync::Arc;

use gigwork_notify::NotificationHub;
use gigwork_store::MemoryStore;

use crate::auth::TokenVerifier;
use crate::config::ApiConfig;
use crate::services::HireService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: MemoryStore,
    pub hub: Arc<NotificationHub>,
    pub verifier: Arc<TokenVerifier>,
    pub hire: HireService,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Self {
        let store = MemoryStore::new();
        let hub = Arc::new(NotificationHub::new());
        let verifier = Arc::new(TokenVerifier::new(&config.jwt_secret));
        let hire = HireService::new(store.clone(), hub.clone(), config.notify_timeout);

        Self {
            config,
            store,
            hub,
            verifier,
            hire,
        }
    }
}
