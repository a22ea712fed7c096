// ============================================================================
// ROUTER - path <-> Route, history navigation
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::state::reactivity::ReactiveState;
use crate::utils::constants::{BRAND_PORTAL_PATH, HOME_PATH, LOGIN_PATH};
use crate::viewmodels::route_guard::GuardMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Users,
    Brands,
    BrandDetail(String),
    Locations,
    Looks,
    BrandPortal,
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|segment| !segment.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["users"] => Route::Users,
            ["brands"] => Route::Brands,
            ["brands", id] => Route::BrandDetail((*id).to_string()),
            ["locations"] => Route::Locations,
            ["looks"] => Route::Looks,
            ["brand-portal", ..] => Route::BrandPortal,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Home => HOME_PATH.to_string(),
            Route::Users => "/users".to_string(),
            Route::Brands => "/brands".to_string(),
            Route::BrandDetail(id) => format!("/brands/{}", id),
            Route::Locations => "/locations".to_string(),
            Route::Looks => "/looks".to_string(),
            Route::BrandPortal => BRAND_PORTAL_PATH.to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Access level the page declares for the route guard
    pub fn guard_mode(&self) -> GuardMode {
        match self {
            Route::Login => GuardMode::Guest,
            _ => GuardMode::Auth,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Home => "Dashboard",
            Route::Users => "Users",
            Route::Brands => "Brands",
            Route::BrandDetail(_) => "Brand",
            Route::Locations => "Locations",
            Route::Looks => "Looks",
            Route::BrandPortal => "Brand portal",
            Route::NotFound(_) => "Not found",
        }
    }
}

/// Current route, kept in sync with `window.location`
#[derive(Clone)]
pub struct Router {
    route: ReactiveState<Route>,
    listening: Rc<Cell<bool>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            route: ReactiveState::new(Route::parse(&current_path())),
            listening: Rc::new(Cell::new(false)),
        }
    }

    pub fn route(&self) -> Route {
        self.route.get()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.route.subscribe(callback);
    }

    /// Push a new history entry and switch route
    pub fn navigate(&self, path: &str) {
        if path == current_path() {
            return;
        }
        log::info!("🧭 [ROUTER] -> {}", path);
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
                log::error!("❌ [ROUTER] pushState failed: {:?}", e);
            }
        }
        self.route.set(Route::parse(path));
    }

    /// Follow back/forward. Registered once; later calls are ignored.
    pub fn listen(&self) -> Result<(), JsValue> {
        if self.listening.replace(true) {
            log::warn!("⚠️ [ROUTER] listen() already called, ignoring");
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let route = self.route.clone();
        let closure = Closure::wrap(Box::new(move |_e: web_sys::PopStateEvent| {
            route.set(Route::parse(&current_path()));
        }) as Box<dyn FnMut(web_sys::PopStateEvent)>);
        window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;
        // Lives as long as the page
        closure.forget();
        Ok(())
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| HOME_PATH.to_string())
}

pub fn current_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// Rewrite the query string in place (no new history entry)
pub fn replace_query(query: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let url = if query.is_empty() {
        current_path()
    } else {
        format!("{}?{}", current_path(), query)
    };
    if let Ok(history) = window.history() {
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url)) {
            log::error!("❌ [ROUTER] replaceState failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/users/"), Route::Users);
        assert_eq!(Route::parse("/brands/42"), Route::BrandDetail("42".to_string()));
        assert_eq!(Route::parse("/brand-portal/ads"), Route::BrandPortal);
        assert_eq!(Route::parse("/nope/1/2"), Route::NotFound("/nope/1/2".to_string()));
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Login,
            Route::Home,
            Route::Users,
            Route::Brands,
            Route::BrandDetail("b1".to_string()),
            Route::Locations,
            Route::Looks,
            Route::BrandPortal,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn only_login_is_a_guest_page() {
        assert_eq!(Route::Login.guard_mode(), GuardMode::Guest);
        assert_eq!(Route::Users.guard_mode(), GuardMode::Auth);
        assert_eq!(Route::BrandPortal.guard_mode(), GuardMode::Auth);
    }
}
