// ============================================================================
// APP - mounts the shell and swaps pages when the route changes
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{body, get_element_by_id, replace_children, set_document_title, ElementBuilder};
use crate::router::Route;
use crate::state::AppState;
use crate::utils::constants::ROOT_ELEMENT_ID;
use crate::viewmodels::route_guard::{GuardController, GuardMode};
use crate::views::{render_page, Page, Shell};

struct AppInner {
    state: AppState,
    root: Element,
    shell: RefCell<Option<Shell>>,
    page: RefCell<Option<Page>>,
    guard: GuardController,
}

#[derive(Clone)]
pub struct App {
    inner: Rc<AppInner>,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let state = AppState::new();
        let root = match get_element_by_id(ROOT_ELEMENT_ID) {
            Some(root) => root,
            None => {
                let root = ElementBuilder::new("div")?.id(ROOT_ELEMENT_ID)?.build();
                body()?.append_child(&root)?;
                root
            }
        };

        let guard = GuardController::attach(
            state.session.clone(),
            state.router.clone(),
            state.router.route().guard_mode(),
        );

        Ok(Self {
            inner: Rc::new(AppInner {
                state,
                root,
                shell: RefCell::new(None),
                page: RefCell::new(None),
                guard,
            }),
        })
    }

    /// Hydrate the session, start following the URL and draw the first page
    pub fn start(&self) -> Result<(), JsValue> {
        let state = &self.inner.state;
        state.session.hydrate();
        state.router.listen()?;

        let app = self.clone();
        state.router.subscribe(move || {
            if let Err(e) = app.render_route() {
                log::error!("❌ [APP] Render failed: {:?}", e);
            }
        });

        self.render_route()
    }

    pub fn state(&self) -> &AppState {
        &self.inner.state
    }

    fn render_route(&self) -> Result<(), JsValue> {
        let state = &self.inner.state;
        let route = state.router.route();
        let mode = route.guard_mode();
        log::info!("📄 [APP] Rendering {:?}", route);

        set_document_title(&format!("{} · Admin", route.title()));
        self.inner.guard.mount(mode);

        // Tear the previous page down before the next one subscribes
        let previous = self.inner.page.borrow_mut().take();
        drop(previous);

        // The guard redirects shortly; avoid firing requests without a token
        let page = if mode == GuardMode::Auth && !state.session.token_state().is_present() {
            Page::new(ElementBuilder::new("div")?.class("page-placeholder").build())
        } else {
            render_page(state, &route)?
        };

        if route == Route::Login {
            replace_children(&self.inner.root, &page.element)?;
        } else {
            let shell = self.ensure_shell()?;
            if !self.inner.root.contains(Some(shell.element().as_ref())) {
                replace_children(&self.inner.root, shell.element())?;
            }
            shell.set_route(&route)?;
            replace_children(shell.content(), &page.element)?;
        }

        *self.inner.page.borrow_mut() = Some(page);
        Ok(())
    }

    fn ensure_shell(&self) -> Result<Shell, JsValue> {
        if let Some(shell) = self.inner.shell.borrow().as_ref() {
            return Ok(shell.clone());
        }
        let shell = Shell::new(&self.inner.state)?;
        *self.inner.shell.borrow_mut() = Some(shell.clone());
        Ok(shell)
    }
}
