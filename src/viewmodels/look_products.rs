// ============================================================================
// LOOK PRODUCTS - drag-and-drop ordering of the products inside a look
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use wasm_bindgen_futures::spawn_local;

use crate::events::EventBus;
use crate::models::{Look, LookProduct};
use crate::services::resource_service;
use crate::services::{endpoints, ApiClient, ApiRequest, HttpMethod};
use crate::state::Subscribers;
use crate::utils::notify::{notify_error, notify_success};

/// Move the element at `from` so it ends up at index `to`.
/// Out-of-range indices and no-op moves return false.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

#[derive(Clone, Debug, Default)]
pub struct ReorderState<T> {
    pub items: Vec<T>,
    pub dragging: Option<usize>,
    /// Order differs from what the server has
    pub dirty: bool,
    pub is_processing: bool,
}

impl<T> ReorderState<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            dragging: None,
            dirty: false,
            is_processing: false,
        }
    }

    pub fn start(&mut self, index: usize) {
        if index < self.items.len() {
            self.dragging = Some(index);
        }
    }

    pub fn drop_on(&mut self, index: usize) -> bool {
        let Some(from) = self.dragging.take() else {
            return false;
        };
        let moved = move_item(&mut self.items, from, index);
        self.dirty |= moved;
        moved
    }
}

/// Order update for a look: `PUT /looks/{id}` with the product ids in order
pub fn order_request(look_id: &str, products: &[LookProduct]) -> ApiRequest {
    let ids: Vec<&str> = products.iter().filter_map(|product| product.id.as_deref()).collect();
    ApiRequest {
        data: Some(json!({ "productIds": ids })),
        ..ApiRequest::new(HttpMethod::Put, endpoints::looks().item(look_id))
    }
}

#[derive(Clone)]
pub struct LookProductsViewModel {
    look_id: Option<String>,
    state: Rc<RefCell<ReorderState<LookProduct>>>,
    subscribers: Subscribers,
}

impl LookProductsViewModel {
    pub fn new(look: &Look) -> Self {
        Self {
            look_id: look.id.clone(),
            state: Rc::new(RefCell::new(ReorderState::new(look.products.clone()))),
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> ReorderState<LookProduct> {
        self.state.borrow().clone()
    }

    pub fn start_drag(&self, index: usize) {
        self.state.borrow_mut().start(index);
    }

    pub fn drop_on(&self, index: usize) {
        let moved = self.state.borrow_mut().drop_on(index);
        if moved {
            self.subscribers.notify();
        }
    }

    pub fn save(&self, api: &ApiClient, bus: &EventBus, reload_topic: &'static str) {
        let Some(look_id) = self.look_id.clone() else {
            return;
        };
        let request = {
            let mut state = self.state.borrow_mut();
            if !state.dirty || state.is_processing {
                return;
            }
            state.is_processing = true;
            order_request(&look_id, &state.items)
        };
        self.subscribers.notify();

        let this = self.clone();
        let api = api.clone();
        let bus = bus.clone();
        spawn_local(async move {
            let result = resource_service::send(&api, request).await;
            {
                let mut state = this.state.borrow_mut();
                state.is_processing = false;
                if result.is_ok() {
                    state.dirty = false;
                }
            }
            this.subscribers.notify();
            match result {
                Ok(_) => {
                    notify_success("Product order saved");
                    bus.publish(reload_topic, serde_json::Value::Null);
                }
                Err(error) => notify_error(&error.user_message()),
            }
        });
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.add(callback);
    }

    /// Stop repainting; a save already in flight still completes
    pub fn detach(&self) {
        self.subscribers.clear();
    }
}
