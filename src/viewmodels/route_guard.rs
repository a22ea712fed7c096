// ============================================================================
// ROUTE GUARD - page access by auth state and role
// ============================================================================
// Every page mounts a guard with its GuardMode. The guard re-evaluates on
// each token transition after a short settling delay. A newer transition
// cancels the pending check, so a store that is still hydrating does not
// cause a redirect flicker.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

use crate::config::CONFIG;
use crate::models::Role;
use crate::router::{current_path, Router};
use crate::state::session_state::{SessionState, TokenState};
use crate::utils::constants::{BRAND_PORTAL_PATH, HOME_PATH, LOGIN_PATH};

/// Access level a page requires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardMode {
    /// Only for signed-out visitors (login)
    Guest,
    /// Only for signed-in users
    Auth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectReason {
    RoleConfinement,
    AlreadySignedIn,
    SignInRequired,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub reason: RedirectReason,
}

/// A role that may only see one path subtree
#[derive(Clone, Copy, Debug)]
pub struct RoleConfinement {
    pub role: Role,
    pub root: &'static str,
}

pub const ROLE_CONFINEMENTS: &[RoleConfinement] = &[RoleConfinement {
    role: Role::Brand,
    root: BRAND_PORTAL_PATH,
}];

fn within(path: &str, root: &str) -> bool {
    let path = path.trim_end_matches('/');
    path == root || path.strip_prefix(root).is_some_and(|rest| rest.starts_with('/'))
}

/// Where (if anywhere) a page with `mode` at `path` must send the user
pub fn decide(mode: GuardMode, token: &TokenState, path: &str, role: Option<Role>) -> Option<Redirect> {
    if !token.is_known() {
        return None;
    }

    if token.is_present() {
        let confinement = role.and_then(|role| ROLE_CONFINEMENTS.iter().find(|c| c.role == role));
        if let Some(confinement) = confinement {
            if !within(path, confinement.root) {
                return Some(Redirect {
                    to: confinement.root.to_string(),
                    reason: RedirectReason::RoleConfinement,
                });
            }
            return None;
        }
    }

    match (mode, token) {
        (GuardMode::Guest, TokenState::Present(_)) => Some(Redirect {
            to: HOME_PATH.to_string(),
            reason: RedirectReason::AlreadySignedIn,
        }),
        (GuardMode::Auth, TokenState::Absent) => Some(Redirect {
            to: LOGIN_PATH.to_string(),
            reason: RedirectReason::SignInRequired,
        }),
        _ => None,
    }
}

/// Guard state of one mounted page. Redirects at most once per token transition.
#[derive(Debug)]
pub struct RouteGuard {
    mode: GuardMode,
    last_seen: Option<TokenState>,
}

impl RouteGuard {
    pub fn mount(mode: GuardMode) -> Self {
        Self { mode, last_seen: None }
    }

    pub fn observe(&mut self, token: &TokenState, path: &str, role: Option<Role>) -> Option<Redirect> {
        if self.last_seen.as_ref() == Some(token) {
            return None;
        }
        self.last_seen = Some(token.clone());
        decide(self.mode, token, path, role)
    }
}

/// Browser wiring: session changes -> settle delay -> observe -> navigate
#[derive(Clone)]
pub struct GuardController {
    guard: Rc<RefCell<RouteGuard>>,
    /// Dropping the held Timeout clears it, so only the latest check runs
    pending: Rc<RefCell<Option<Timeout>>>,
    session: SessionState,
    router: Router,
}

impl GuardController {
    /// Subscribes to the session once; call `mount` on every page change
    pub fn attach(session: SessionState, router: Router, mode: GuardMode) -> Self {
        let controller = Self {
            guard: Rc::new(RefCell::new(RouteGuard::mount(mode))),
            pending: Rc::new(RefCell::new(None)),
            session,
            router,
        };
        let on_change = controller.clone();
        controller.session.subscribe(move || on_change.schedule());
        controller
    }

    pub fn mount(&self, mode: GuardMode) {
        *self.guard.borrow_mut() = RouteGuard::mount(mode);
        self.schedule();
    }

    fn schedule(&self) {
        let guard = self.guard.clone();
        let session = self.session.clone();
        let router = self.router.clone();
        let pending = Rc::downgrade(&self.pending);
        let timeout = Timeout::new(CONFIG.timing.guard_settle_ms, move || {
            // A redirect re-mounts and schedules again; release this timer
            // from the slot first so it is not dropped while running
            let fired = pending.upgrade().and_then(|slot| slot.take());
            if let Some(fired) = fired {
                fired.forget();
            }
            evaluate(&guard, &session, &router);
        });
        let previous = self.pending.borrow_mut().replace(timeout);
        drop(previous);
    }
}

fn evaluate(guard: &RefCell<RouteGuard>, session: &SessionState, router: &Router) {
    let path = current_path();
    let redirect = guard
        .borrow_mut()
        .observe(&session.token_state(), &path, session.role());
    if let Some(redirect) = redirect {
        log::info!("🛡️ [GUARD] {} -> {} ({:?})", path, redirect.to, redirect.reason);
        router.navigate(&redirect.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present() -> TokenState {
        TokenState::Present("jwt".to_string())
    }

    #[test]
    fn unknown_token_never_redirects() {
        for mode in [GuardMode::Guest, GuardMode::Auth] {
            assert_eq!(decide(mode, &TokenState::Unknown, "/users", None), None);
            assert_eq!(decide(mode, &TokenState::Unknown, "/users", Some(Role::Brand)), None);
        }
    }

    #[test]
    fn auth_page_without_token_goes_to_login() {
        let redirect = decide(GuardMode::Auth, &TokenState::Absent, "/brands", None).unwrap();
        assert_eq!(redirect.to, "/login");
        assert_eq!(redirect.reason, RedirectReason::SignInRequired);
        assert_eq!(decide(GuardMode::Auth, &present(), "/brands", Some(Role::Admin)), None);
    }

    #[test]
    fn guest_page_with_token_goes_home() {
        let redirect = decide(GuardMode::Guest, &present(), "/login", Some(Role::Admin)).unwrap();
        assert_eq!(redirect.to, "/");
        assert_eq!(decide(GuardMode::Guest, &TokenState::Absent, "/login", None), None);
    }

    #[test]
    fn role_confinement_takes_precedence() {
        let redirect = decide(GuardMode::Guest, &present(), "/login", Some(Role::Brand)).unwrap();
        assert_eq!(redirect.to, "/brand-portal");
        assert_eq!(redirect.reason, RedirectReason::RoleConfinement);

        assert_eq!(
            decide(GuardMode::Auth, &present(), "/users", Some(Role::Brand)).map(|r| r.to),
            Some("/brand-portal".to_string())
        );
        assert_eq!(decide(GuardMode::Auth, &present(), "/brand-portal", Some(Role::Brand)), None);
        assert_eq!(decide(GuardMode::Auth, &present(), "/brand-portal/ads", Some(Role::Brand)), None);
        assert!(decide(GuardMode::Auth, &present(), "/brand-portalx", Some(Role::Brand)).is_some());
    }

    #[test]
    fn redirects_once_per_token_transition() {
        let mut guard = RouteGuard::mount(GuardMode::Auth);

        assert_eq!(guard.observe(&TokenState::Unknown, "/users", None), None);
        let first = guard.observe(&TokenState::Absent, "/users", None);
        assert_eq!(first.map(|r| r.to), Some("/login".to_string()));
        assert_eq!(guard.observe(&TokenState::Absent, "/users", None), None);

        assert_eq!(guard.observe(&present(), "/users", Some(Role::Admin)), None);
        let again = guard.observe(&TokenState::Absent, "/users", None);
        assert_eq!(again.map(|r| r.to), Some("/login".to_string()));
    }

    #[test]
    fn remount_re_evaluates_the_current_token() {
        let mut guard = RouteGuard::mount(GuardMode::Auth);
        assert!(guard.observe(&TokenState::Absent, "/users", None).is_some());

        let mut guard = RouteGuard::mount(GuardMode::Auth);
        assert!(guard.observe(&TokenState::Absent, "/looks", None).is_some());
    }
}
