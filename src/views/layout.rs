// ============================================================================
// LAYOUT - sidebar, header and content host around every signed-in page
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, clear, on_click, set_text_content, toggle_class, ElementBuilder};
use crate::events::topics::REFRESH_DATA;
use crate::models::Role;
use crate::router::Route;
use crate::state::AppState;
use crate::viewmodels::SessionViewModel;

const ADMIN_NAV: &[(&str, Route)] = &[
    ("Dashboard", Route::Home),
    ("Users", Route::Users),
    ("Brands", Route::Brands),
    ("Locations", Route::Locations),
    ("Looks", Route::Looks),
];

const BRAND_NAV: &[(&str, Route)] = &[("Brand portal", Route::BrandPortal)];

/// Links shown to a role
pub fn nav_items(role: Option<Role>) -> &'static [(&'static str, Route)] {
    match role {
        Some(Role::Brand) => BRAND_NAV,
        _ => ADMIN_NAV,
    }
}

/// Which nav entry a route highlights
fn nav_target(route: &Route) -> Route {
    match route {
        Route::BrandDetail(_) => Route::Brands,
        other => other.clone(),
    }
}

struct ShellInner {
    state: AppState,
    element: Element,
    nav: Element,
    user_label: Element,
    title: Element,
    content: Element,
    route: RefCell<Route>,
}

/// Built once; pages swap in and out of `content()`
#[derive(Clone)]
pub struct Shell {
    inner: Rc<ShellInner>,
}

impl Shell {
    pub fn new(state: &AppState) -> Result<Self, JsValue> {
        let toggle = ElementBuilder::new("button")?
            .class("btn-icon sidebar-toggle")
            .attr("aria-label", "Toggle sidebar")?
            .text("☰")
            .build();
        let nav = ElementBuilder::new("nav")?.class("sidebar-nav").build();
        let user_label = ElementBuilder::new("div")?.class("sidebar-user").build();
        let logout = ElementBuilder::new("button")?.class("btn btn-link").text("Sign out").build();

        let sidebar = ElementBuilder::new("aside")?
            .class("sidebar")
            .child(toggle.clone())?
            .child(nav.clone())?
            .child(
                ElementBuilder::new("div")?
                    .class("sidebar-footer")
                    .child(user_label.clone())?
                    .child(logout.clone())?
                    .build(),
            )?
            .build();

        let title = ElementBuilder::new("h1")?.class("page-title").build();
        let refresh = ElementBuilder::new("button")?.class("btn").text("Refresh").build();
        let header = ElementBuilder::new("header")?
            .class("topbar")
            .child(title.clone())?
            .child(refresh.clone())?
            .build();
        let content = ElementBuilder::new("main")?.class("content").build();

        let element = ElementBuilder::new("div")?
            .class("shell")
            .child(sidebar)?
            .child(
                ElementBuilder::new("div")?
                    .class("shell-main")
                    .child(header)?
                    .child(content.clone())?
                    .build(),
            )?
            .build();
        toggle_class(&element, "collapsed", state.ui.sidebar_collapsed())?;

        let shell = Self {
            inner: Rc::new(ShellInner {
                state: state.clone(),
                element,
                nav,
                user_label,
                title,
                content,
                route: RefCell::new(state.router.route()),
            }),
        };

        {
            let ui = state.ui.clone();
            on_click(&toggle, move |_| ui.toggle_sidebar())?;
        }
        {
            let ui = state.ui.clone();
            let element = shell.inner.element.clone();
            state.ui.subscribe(move || {
                if let Err(e) = toggle_class(&element, "collapsed", ui.sidebar_collapsed()) {
                    log::error!("❌ [SHELL] Sidebar toggle failed: {:?}", e);
                }
            });
        }
        {
            let session = SessionViewModel::new(state.session.clone(), state.router.clone(), state.api.clone());
            on_click(&logout, move |_| session.logout())?;
        }
        {
            let bus = state.bus.clone();
            on_click(&refresh, move |_| bus.publish(REFRESH_DATA, serde_json::Value::Null))?;
        }
        {
            let shell_for_session = shell.clone();
            state.session.subscribe(move || {
                if let Err(e) = shell_for_session.paint_session() {
                    log::error!("❌ [SHELL] Render failed: {:?}", e);
                }
            });
        }

        shell.paint_session()?;
        Ok(shell)
    }

    pub fn element(&self) -> &Element {
        &self.inner.element
    }

    pub fn content(&self) -> &Element {
        &self.inner.content
    }

    /// Update the header title and the highlighted link
    pub fn set_route(&self, route: &Route) -> Result<(), JsValue> {
        *self.inner.route.borrow_mut() = route.clone();
        set_text_content(&self.inner.title, route.title());
        self.paint_nav()
    }

    fn paint_session(&self) -> Result<(), JsValue> {
        let label = self
            .inner
            .state
            .session
            .user()
            .map(|user| user.display_name())
            .unwrap_or_default();
        set_text_content(&self.inner.user_label, &label);
        self.paint_nav()
    }

    fn paint_nav(&self) -> Result<(), JsValue> {
        let nav = &self.inner.nav;
        clear(nav);
        let active = nav_target(&self.inner.route.borrow());

        for (label, route) in nav_items(self.inner.state.session.role()) {
            let path = route.path();
            let link = ElementBuilder::new("a")?
                .class(if *route == active { "nav-link active" } else { "nav-link" })
                .attr("href", &path)?
                .text(label)
                .build();
            let router = self.inner.state.router.clone();
            on_click(&link, move |event| {
                event.prevent_default();
                router.navigate(&path);
            })?;
            append_child(nav, &link)?;
        }
        Ok(())
    }
}
