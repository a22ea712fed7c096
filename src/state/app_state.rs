// ============================================================================
// APP STATE - the process-wide stores, created once at startup
// ============================================================================

use std::rc::Rc;

use crate::config::CONFIG;
use crate::events::EventBus;
use crate::router::Router;
use crate::services::ApiClient;
use crate::state::{SessionState, UiState};
use crate::utils::storage::{DurableStorage, TabStorage};

/// Cheap to clone; every field shares its underlying store
#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub ui: UiState,
    pub bus: EventBus,
    pub api: ApiClient,
    pub router: Router,
}

impl AppState {
    /// Session in tab storage, UI preferences in durable storage
    pub fn new() -> Self {
        let session = SessionState::new(Rc::new(TabStorage), &CONFIG.auth_storage_key());
        let ui = UiState::load(Rc::new(DurableStorage), &CONFIG.ui_storage_key());
        let api = ApiClient::new(session.clone());
        Self {
            session,
            ui,
            bus: EventBus::new(),
            api,
            router: Router::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
