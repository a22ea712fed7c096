// ============================================================================
// SESSION VIEWMODEL - login form and logout
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;

use crate::config::CONFIG;
use crate::models::{LoginResponse, Role};
use crate::router::Router;
use crate::services::auth_service::perform_login;
use crate::services::ApiClient;
use crate::state::{SessionState, Subscribers};
use crate::utils::constants::{BRAND_PORTAL_PATH, HOME_PATH, LOGIN_PATH};
use crate::utils::notify::{notify_error, notify_success};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub is_processing: bool,
    pub error: Option<String>,
}

/// Presence checks before anything is sent
pub fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    Ok(())
}

/// Page a freshly signed-in user lands on
pub fn landing_path(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Brand) => BRAND_PORTAL_PATH,
        _ => HOME_PATH,
    }
}

/// Store everything the login endpoint returned
pub fn store_login(session: &SessionState, response: LoginResponse) {
    session.set_token(response.token);
    session.set_user(response.user);
    session.set_user_permissions(response.user_permissions.unwrap_or_default());
}

#[derive(Clone)]
pub struct SessionViewModel {
    session: SessionState,
    router: Router,
    api: ApiClient,
    form: Rc<RefCell<LoginForm>>,
    subscribers: Subscribers,
}

impl SessionViewModel {
    pub fn new(session: SessionState, router: Router, api: ApiClient) -> Self {
        Self {
            session,
            router,
            api,
            form: Rc::new(RefCell::new(LoginForm::default())),
            subscribers: Subscribers::default(),
        }
    }

    pub fn form(&self) -> LoginForm {
        self.form.borrow().clone()
    }

    pub fn set_email(&self, email: String) {
        self.form.borrow_mut().email = email;
    }

    pub fn set_password(&self, password: String) {
        self.form.borrow_mut().password = password;
    }

    /// Validate, mark processing and hand back the credentials to send
    fn begin_login(&self) -> Option<(String, String)> {
        let credentials = {
            let mut form = self.form.borrow_mut();
            if form.is_processing {
                return None;
            }
            match validate_credentials(&form.email, &form.password) {
                Ok(()) => {
                    form.is_processing = true;
                    form.error = None;
                    Some((form.email.clone(), form.password.clone()))
                }
                Err(message) => {
                    form.error = Some(message);
                    None
                }
            }
        };
        self.subscribers.notify();
        credentials
    }

    pub fn login(&self) {
        let Some((email, password)) = self.begin_login() else {
            if let Some(error) = self.form.borrow().error.clone() {
                notify_error(&error);
            }
            return;
        };

        let this = self.clone();
        spawn_local(async move {
            let result = perform_login(&this.api, &email, &password).await;
            {
                let mut form = this.form.borrow_mut();
                form.is_processing = false;
                if let Err(error) = &result {
                    form.error = Some(error.user_message());
                } else {
                    form.password.clear();
                }
            }
            this.subscribers.notify();

            match result {
                Ok(response) => {
                    let target = landing_path(response.user.role);
                    log::info!("✅ [AUTH] Signed in as {}", response.user.display_name());
                    notify_success(&format!("Welcome back, {}", response.user.display_name()));
                    store_login(&this.session, response);

                    // Let the session store settle before leaving the login page
                    let router = this.router.clone();
                    Timeout::new(CONFIG.timing.login_redirect_delay_ms, move || {
                        router.navigate(target);
                    })
                    .forget();
                }
                Err(error) => {
                    log::warn!("⚠️ [AUTH] Login failed: {}", error);
                    notify_error(&error.user_message());
                }
            }
        });
    }

    pub fn logout(&self) {
        self.session.clear_token();
        self.router.navigate(LOGIN_PATH);
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.add(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session_state::TokenState;
    use crate::utils::storage::{MemoryStorage, StorageArea};
    use serde_json::json;

    #[test]
    fn credentials_must_be_present() {
        assert_eq!(validate_credentials("  ", "pw"), Err("Email is required".to_string()));
        assert_eq!(validate_credentials("a@b.c", ""), Err("Password is required".to_string()));
        assert!(validate_credentials("a@b.c", "pw").is_ok());
    }

    #[test]
    fn brand_users_land_on_their_portal() {
        assert_eq!(landing_path(Some(Role::Brand)), BRAND_PORTAL_PATH);
        assert_eq!(landing_path(Some(Role::Admin)), HOME_PATH);
        assert_eq!(landing_path(None), HOME_PATH);
    }

    #[test]
    fn login_response_fills_the_session() {
        let storage = MemoryStorage::default();
        let session = SessionState::new(Rc::new(storage.clone()), "admin.auth");
        let response: LoginResponse = serde_json::from_value(json!({
            "token": "jwt-1",
            "user": {"_id": "u1", "email": "ada@example.com", "role": "admin"},
            "userPermissions": {"users": true}
        }))
        .unwrap();

        store_login(&session, response);
        assert_eq!(session.token_state(), TokenState::Present("jwt-1".to_string()));
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(session.permissions().unwrap().0.get("users"), Some(&json!(true)));
        assert!(storage.read("admin.auth").unwrap().contains("jwt-1"));
    }
}
