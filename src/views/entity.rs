// One entity workflow on a page: list + editor drawer + delete prompt,
// all wired through the entity's TopicSet.

use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::services::Endpoints;
use crate::state::AppState;
use crate::viewmodels::resource::Resource;
use crate::viewmodels::{ConfirmationController, DrawerController, ListViewModel};
use crate::views::confirmation::render_confirmation;
use crate::views::drawer::render_drawer;
use crate::views::page::Page;
use crate::views::table::{render_table, TableOptions};

pub struct EntitySection<R> {
    pub list: ListViewModel<R>,
    pub drawer: DrawerController<R>,
    pub confirm: ConfirmationController<R>,
    pub element: Element,
}

impl<R: Resource> EntitySection<R> {
    /// `prefix` namespaces the URL params when several sections share a page
    pub fn mount(
        state: &AppState,
        prefix: &str,
        endpoints: Endpoints,
        options: TableOptions<R>,
        defaults: Map<String, Value>,
    ) -> Result<Self, JsValue> {
        let topics = options.topics;

        let list = ListViewModel::<R>::new(prefix);
        list.bind_location();
        list.use_remote(state.api.clone(), endpoints.clone());
        list.attach(&state.bus, topics.reload);

        let drawer = DrawerController::with_defaults(&state.bus, topics, endpoints.clone(), defaults);
        let confirm = ConfirmationController::new(&state.bus, topics, endpoints);

        let element = ElementBuilder::new("div")?
            .class("entity-section")
            .child(render_table(&list, &state.bus, options)?)?
            .child(render_drawer(&drawer, &state.api)?)?
            .child(render_confirmation(&confirm, &state.api)?)?
            .build();

        list.fetch();
        Ok(Self {
            list,
            drawer,
            confirm,
            element,
        })
    }

    /// Tear the section down with `page`
    pub fn bind_to(&self, page: &mut Page) {
        let list = self.list.clone();
        let drawer = self.drawer.clone();
        let confirm = self.confirm.clone();
        page.on_dispose(move || {
            list.detach();
            drawer.detach();
            confirm.detach();
        });
    }
}
