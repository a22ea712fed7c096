// ============================================================================
// UI STATE - layout preferences kept across browser sessions
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::state::reactivity::Subscribers;
use crate::utils::storage::{load_json, save_json, SharedStorage};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPreferences {
    #[serde(default)]
    pub sidebar_collapsed: bool,
}

#[derive(Clone)]
pub struct UiState {
    sidebar_collapsed: Rc<Cell<bool>>,
    storage: SharedStorage,
    storage_key: Rc<str>,
    subscribers: Subscribers,
}

impl UiState {
    /// Load preferences from durable storage (defaults when absent)
    pub fn load(storage: SharedStorage, storage_key: &str) -> Self {
        let prefs: UiPreferences = load_json(storage.as_ref(), storage_key).unwrap_or_default();
        Self {
            sidebar_collapsed: Rc::new(Cell::new(prefs.sidebar_collapsed)),
            storage,
            storage_key: Rc::from(storage_key),
            subscribers: Subscribers::default(),
        }
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed.get()
    }

    /// The only way the preference changes
    pub fn toggle_sidebar(&self) {
        self.sidebar_collapsed.set(!self.sidebar_collapsed.get());
        let prefs = UiPreferences {
            sidebar_collapsed: self.sidebar_collapsed.get(),
        };
        if let Err(e) = save_json(self.storage.as_ref(), &self.storage_key, &prefs) {
            log::error!("❌ [UI] Could not persist preferences: {}", e);
        }
        self.subscribers.notify();
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.add(callback);
    }
}
