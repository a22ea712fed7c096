// ============================================================================
// SESSION STATE - token, profile and permissions of the signed-in user
// ============================================================================
// Persisted as one JSON object in tab-scoped storage. Every setter persists
// and then notifies subscribers; nothing here talks to the network.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::models::{Permissions, Role, UserProfile};
use crate::state::reactivity::Subscribers;
use crate::utils::storage::{load_json, save_json, SharedStorage};

/// What is known about the auth token
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TokenState {
    /// Storage not read yet; guards must wait
    #[default]
    Unknown,
    /// Confirmed logged out
    Absent,
    Present(String),
}

impl TokenState {
    pub fn token(&self) -> Option<&str> {
        match self {
            TokenState::Present(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, TokenState::Present(_))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TokenState::Unknown)
    }
}

/// Persisted shape of the session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub permissions: Option<Permissions>,
}

#[derive(Clone)]
pub struct SessionState {
    token: Rc<RefCell<TokenState>>,
    user: Rc<RefCell<Option<UserProfile>>>,
    permissions: Rc<RefCell<Option<Permissions>>>,
    storage: SharedStorage,
    storage_key: Rc<str>,
    subscribers: Subscribers,
}

impl SessionState {
    /// Create an empty, not-yet-hydrated store
    pub fn new(storage: SharedStorage, storage_key: &str) -> Self {
        Self {
            token: Rc::new(RefCell::new(TokenState::Unknown)),
            user: Rc::new(RefCell::new(None)),
            permissions: Rc::new(RefCell::new(None)),
            storage,
            storage_key: Rc::from(storage_key),
            subscribers: Subscribers::default(),
        }
    }

    /// Read the persisted session. Afterwards the token is never `Unknown`.
    pub fn hydrate(&self) {
        let snapshot: SessionSnapshot = load_json(self.storage.as_ref(), &self.storage_key).unwrap_or_default();

        *self.token.borrow_mut() = match snapshot.token {
            Some(token) if !token.is_empty() => TokenState::Present(token),
            _ => TokenState::Absent,
        };
        *self.user.borrow_mut() = snapshot.user;
        *self.permissions.borrow_mut() = snapshot.permissions;

        log::info!(
            "💾 [SESSION] Hydrated ({})",
            if self.token.borrow().is_present() { "signed in" } else { "signed out" }
        );
        self.subscribers.notify();
    }

    pub fn set_token(&self, token: String) {
        *self.token.borrow_mut() = TokenState::Present(token);
        self.persist();
        self.subscribers.notify();
    }

    pub fn set_user(&self, user: UserProfile) {
        *self.user.borrow_mut() = Some(user);
        self.persist();
        self.subscribers.notify();
    }

    pub fn set_user_permissions(&self, permissions: Permissions) {
        *self.permissions.borrow_mut() = Some(permissions);
        self.persist();
        self.subscribers.notify();
    }

    /// Log out: token, user and permissions are reset together
    pub fn clear_token(&self) {
        *self.token.borrow_mut() = TokenState::Absent;
        *self.user.borrow_mut() = None;
        *self.permissions.borrow_mut() = None;
        self.storage.remove(&self.storage_key);
        log::info!("👋 [SESSION] Cleared");
        self.subscribers.notify();
    }

    pub fn token_state(&self) -> TokenState {
        self.token.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().token().map(str::to_string)
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.user.borrow().clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.borrow().as_ref().and_then(|user| user.role)
    }

    pub fn permissions(&self) -> Option<Permissions> {
        self.permissions.borrow().clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            token: self.token(),
            user: self.user(),
            permissions: self.permissions(),
        }
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.add(callback);
    }

    fn persist(&self) {
        if let Err(e) = save_json(self.storage.as_ref(), &self.storage_key, &self.snapshot()) {
            log::error!("❌ [SESSION] Could not persist session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::{MemoryStorage, StorageArea};
    use std::cell::Cell;

    const KEY: &str = "catalog-admin.auth";

    fn profile(role: Role) -> UserProfile {
        serde_json::from_value(serde_json::json!({"id": 1, "email": "a@b.com", "role": role})).unwrap()
    }

    #[test]
    fn starts_unknown_until_hydrated() {
        let session = SessionState::new(Rc::new(MemoryStorage::new()), KEY);
        assert_eq!(session.token_state(), TokenState::Unknown);

        session.hydrate();
        assert_eq!(session.token_state(), TokenState::Absent);
    }

    #[test]
    fn clear_restores_the_initial_snapshot() {
        let storage = MemoryStorage::new();
        let session = SessionState::new(Rc::new(storage.clone()), KEY);
        session.hydrate();
        let initial = session.snapshot();

        session.set_token("t-1".to_string());
        session.set_user(profile(Role::Admin));
        session.set_user_permissions(Permissions::default());
        session.set_token("t-2".to_string());
        session.clear_token();

        assert_eq!(session.snapshot(), initial);
        assert_eq!(session.token_state(), TokenState::Absent);
        assert!(storage.read(KEY).is_none());
    }

    #[test]
    fn setters_persist_and_hydrate_restores() {
        let storage = MemoryStorage::new();
        let session = SessionState::new(Rc::new(storage.clone()), KEY);
        session.set_token("jwt".to_string());
        session.set_user(profile(Role::Creator));

        let reloaded = SessionState::new(Rc::new(storage), KEY);
        reloaded.hydrate();
        assert_eq!(reloaded.token_state(), TokenState::Present("jwt".to_string()));
        assert_eq!(reloaded.role(), Some(Role::Creator));
    }

    #[test]
    fn every_transition_notifies_subscribers() {
        let session = SessionState::new(Rc::new(MemoryStorage::new()), KEY);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        session.subscribe(move || counter.set(counter.get() + 1));

        session.hydrate();
        session.set_token("a".to_string());
        session.set_user(profile(Role::Admin));
        session.clear_token();

        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn empty_persisted_token_counts_as_absent() {
        let storage = MemoryStorage::new();
        storage.write(KEY, r#"{"token":"","user":null,"permissions":null}"#).unwrap();

        let session = SessionState::new(Rc::new(storage), KEY);
        session.hydrate();
        assert_eq!(session.token_state(), TokenState::Absent);
    }
}
