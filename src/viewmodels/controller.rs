// ============================================================================
// CONTROLLERS - drawer (create/update) and confirmation (delete) workflows
// ============================================================================
// A controller listens on its open topic, owns the editing state while the
// overlay is shown, and announces success on the entity's reload topic.
// While a request is in flight further submissions are ignored.
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};
use wasm_bindgen_futures::spawn_local;

use crate::events::bus::decode_detail;
use crate::events::topics::is_new_record;
use crate::events::{EventBus, Subscription, TopicSet};
use crate::services::resource_service;
use crate::services::{ApiClient, ApiError, ApiRequest, Endpoints};
use crate::state::Subscribers;
use crate::utils::notify::{notify_error, notify_success};
use crate::viewmodels::resource::{FormState, Resource};

/// Outcome of a finished request, for the caller's toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Saved(String),
    Failed(String),
}

#[derive(Clone)]
pub struct DrawerState<R> {
    pub open: bool,
    /// `None` while creating
    pub record: Option<R>,
    pub form: FormState,
    pub is_processing: bool,
    pub error: Option<String>,
}

impl<R> Default for DrawerState<R> {
    fn default() -> Self {
        Self {
            open: false,
            record: None,
            form: FormState::default(),
            is_processing: false,
            error: None,
        }
    }
}

struct DrawerInner<R> {
    bus: EventBus,
    topics: TopicSet,
    endpoints: Endpoints,
    /// Merged into the form of a new record (e.g. the owning brand id)
    defaults: Map<String, Value>,
    state: RefCell<DrawerState<R>>,
    subscribers: Subscribers,
    subscription: RefCell<Option<Subscription>>,
}

pub struct DrawerController<R> {
    inner: Rc<DrawerInner<R>>,
}

impl<R> Clone for DrawerController<R> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<R: Resource> DrawerController<R> {
    #[cfg(test)]
    pub fn new(bus: &EventBus, topics: TopicSet, endpoints: Endpoints) -> Self {
        Self::with_defaults(bus, topics, endpoints, Map::new())
    }

    pub fn with_defaults(bus: &EventBus, topics: TopicSet, endpoints: Endpoints, defaults: Map<String, Value>) -> Self {
        let controller = Self {
            inner: Rc::new(DrawerInner {
                bus: bus.clone(),
                topics,
                endpoints,
                defaults,
                state: RefCell::new(DrawerState::default()),
                subscribers: Subscribers::default(),
                subscription: RefCell::new(None),
            }),
        };

        let weak: Weak<DrawerInner<R>> = Rc::downgrade(&controller.inner);
        let subscription = bus.subscribe(topics.drawer, move |detail| {
            if let Some(inner) = weak.upgrade() {
                DrawerController { inner }.open_with(detail);
            }
        });
        *controller.inner.subscription.borrow_mut() = Some(subscription);
        controller
    }

    /// Seed the editing state from an open-topic payload. Ignored while a
    /// save is in flight so its completion applies to the record it sent.
    pub fn open_with(&self, detail: &Value) {
        if self.inner.state.borrow().is_processing {
            log::debug!("⏳ [DRAWER] {} busy, open ignored", R::LABEL);
            return;
        }
        let (record, form) = if is_new_record(detail) {
            let mut form = FormState::default();
            form.merge(&self.inner.defaults);
            (None, form)
        } else {
            match decode_detail::<R>(detail) {
                Some(record) => {
                    let form = FormState::from_record(&record);
                    (Some(record), form)
                }
                None => return,
            }
        };

        log::debug!(
            "📝 [DRAWER] {} {}",
            if record.is_some() { "Editing" } else { "Creating" },
            R::LABEL
        );
        *self.inner.state.borrow_mut() = DrawerState {
            open: true,
            record,
            form,
            is_processing: false,
            error: None,
        };
        self.inner.subscribers.notify();
    }

    pub fn close(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.open {
                return;
            }
            state.open = false;
            state.error = None;
        }
        self.inner.subscribers.notify();
    }

    pub fn state(&self) -> DrawerState<R> {
        self.inner.state.borrow().clone()
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().open
    }

    pub fn is_processing(&self) -> bool {
        self.inner.state.borrow().is_processing
    }

    /// Unsubscribe from the open topic and drop view callbacks
    pub fn detach(&self) {
        self.inner.subscription.borrow_mut().take();
        self.inner.subscribers.clear();
    }

    /// Update one input; no re-render so the focused control keeps its caret
    pub fn set_field(&self, name: &str, raw: &str) {
        if let Some(field) = R::FIELDS.iter().find(|field| field.name == name) {
            self.inner.state.borrow_mut().form.set(field, raw);
        }
    }

    pub fn set_file(&self, name: &str, file: web_sys::File) {
        self.inner.state.borrow_mut().form.set_file(name, file);
    }

    /// Validate and lock. `None` when a save is already running, the drawer
    /// is closed, or a required field is empty (the error is then set).
    pub fn begin_save(&self) -> Option<ApiRequest> {
        let request = {
            let mut state = self.inner.state.borrow_mut();
            if !state.open || state.is_processing {
                return None;
            }

            let missing = state.form.missing(R::FIELDS);
            if let Some(first) = missing.first() {
                state.error = Some(format!("{} is required", first));
                None
            } else {
                state.is_processing = true;
                state.error = None;
                let id = state.record.as_ref().and_then(|record| record.id().map(str::to_string));
                Some(self.inner.endpoints.save_request(
                    id.as_deref(),
                    R::payload(&state.form),
                    state.form.files(),
                ))
            }
        };
        self.inner.subscribers.notify();
        request
    }

    /// Unlock after the request. Success closes and publishes the reload
    /// topic; failure keeps the drawer open with the message.
    pub fn finish(&self, result: Result<Value, ApiError>) -> Settled {
        let settled = {
            let mut state = self.inner.state.borrow_mut();
            state.is_processing = false;
            match &result {
                Ok(_) => {
                    state.open = false;
                    state.error = None;
                    let verb = if state.record.is_some() { "updated" } else { "created" };
                    Settled::Saved(format!("{} {}", R::LABEL, verb))
                }
                Err(error) => {
                    let message = error.user_message();
                    state.error = Some(message.clone());
                    Settled::Failed(message)
                }
            }
        };

        match &settled {
            Settled::Saved(_) => {
                log::info!("✅ [DRAWER] {} saved", R::LABEL);
                self.inner.bus.publish(self.inner.topics.reload, Value::Null);
            }
            Settled::Failed(message) => log::warn!("⚠️ [DRAWER] {} save failed: {}", R::LABEL, message),
        }
        self.inner.subscribers.notify();
        settled
    }

    pub fn save(&self, api: &ApiClient) {
        let Some(request) = self.begin_save() else {
            if let Some(error) = self.inner.state.borrow().error.clone() {
                notify_error(&error);
            }
            return;
        };
        let controller = self.clone();
        let api = api.clone();
        spawn_local(async move {
            let result = resource_service::send(&api, request).await;
            announce(&controller.finish(result));
        });
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.subscribers.add(callback);
    }
}

#[derive(Clone)]
pub struct ConfirmationState<R> {
    pub open: bool,
    pub record: Option<R>,
    pub is_processing: bool,
    pub error: Option<String>,
}

impl<R> Default for ConfirmationState<R> {
    fn default() -> Self {
        Self {
            open: false,
            record: None,
            is_processing: false,
            error: None,
        }
    }
}

struct ConfirmationInner<R> {
    bus: EventBus,
    topics: TopicSet,
    endpoints: Endpoints,
    state: RefCell<ConfirmationState<R>>,
    subscribers: Subscribers,
    subscription: RefCell<Option<Subscription>>,
}

pub struct ConfirmationController<R> {
    inner: Rc<ConfirmationInner<R>>,
}

impl<R> Clone for ConfirmationController<R> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<R: Resource> ConfirmationController<R> {
    pub fn new(bus: &EventBus, topics: TopicSet, endpoints: Endpoints) -> Self {
        let controller = Self {
            inner: Rc::new(ConfirmationInner {
                bus: bus.clone(),
                topics,
                endpoints,
                state: RefCell::new(ConfirmationState::default()),
                subscribers: Subscribers::default(),
                subscription: RefCell::new(None),
            }),
        };

        let weak = Rc::downgrade(&controller.inner);
        let subscription = bus.subscribe(topics.confirmation, move |detail| {
            if let Some(inner) = weak.upgrade() {
                ConfirmationController { inner }.open_with(detail);
            }
        });
        *controller.inner.subscription.borrow_mut() = Some(subscription);
        controller
    }

    pub fn open_with(&self, detail: &Value) {
        if self.inner.state.borrow().is_processing {
            log::debug!("⏳ [CONFIRM] {} busy, open ignored", R::LABEL);
            return;
        }
        let Some(record) = decode_detail::<R>(detail) else {
            return;
        };
        if record.id().is_none() {
            log::warn!("⚠️ [CONFIRM] {} without id, ignoring", R::LABEL);
            return;
        }
        *self.inner.state.borrow_mut() = ConfirmationState {
            open: true,
            record: Some(record),
            is_processing: false,
            error: None,
        };
        self.inner.subscribers.notify();
    }

    pub fn close(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.open {
                return;
            }
            state.open = false;
            state.error = None;
        }
        self.inner.subscribers.notify();
    }

    pub fn state(&self) -> ConfirmationState<R> {
        self.inner.state.borrow().clone()
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().open
    }

    pub fn detach(&self) {
        self.inner.subscription.borrow_mut().take();
        self.inner.subscribers.clear();
    }

    pub fn begin_confirm(&self) -> Option<ApiRequest> {
        let request = {
            let mut state = self.inner.state.borrow_mut();
            if !state.open || state.is_processing {
                return None;
            }
            let id = state.record.as_ref().and_then(|record| record.id().map(str::to_string))?;
            state.is_processing = true;
            state.error = None;
            self.inner.endpoints.delete_request(&id)
        };
        self.inner.subscribers.notify();
        Some(request)
    }

    pub fn finish(&self, result: Result<Value, ApiError>) -> Settled {
        let settled = {
            let mut state = self.inner.state.borrow_mut();
            state.is_processing = false;
            match &result {
                Ok(_) => {
                    state.open = false;
                    Settled::Saved(format!("{} deleted", R::LABEL))
                }
                Err(error) => {
                    let message = error.user_message();
                    state.error = Some(message.clone());
                    Settled::Failed(message)
                }
            }
        };

        match &settled {
            Settled::Saved(_) => {
                log::info!("🗑️ [CONFIRM] {} deleted", R::LABEL);
                self.inner.bus.publish(self.inner.topics.reload, Value::Null);
            }
            Settled::Failed(message) => log::warn!("⚠️ [CONFIRM] {} delete failed: {}", R::LABEL, message),
        }
        self.inner.subscribers.notify();
        settled
    }

    pub fn confirm(&self, api: &ApiClient) {
        let Some(request) = self.begin_confirm() else {
            return;
        };
        let controller = self.clone();
        let api = api.clone();
        spawn_local(async move {
            let result = resource_service::send(&api, request).await;
            announce(&controller.finish(result));
        });
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.subscribers.add(callback);
    }
}

fn announce(settled: &Settled) {
    match settled {
        Settled::Saved(message) => notify_success(message),
        Settled::Failed(message) => notify_error(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::topics::{BRANDS, BRAND_CAMPAIGNS, LOOKS, NEW_RECORD};
    use crate::models::{Brand, Campaign, Look};
    use crate::services::endpoints;
    use crate::services::HttpMethod;
    use serde_json::json;
    use std::cell::Cell;

    fn reload_counter(bus: &EventBus, topic: &str) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        bus.subscribe(topic, move |_| seen.set(seen.get() + 1)).forget();
        count
    }

    #[test]
    fn opens_on_its_topic_with_a_record_or_blank() {
        let bus = EventBus::new();
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        assert!(!drawer.is_open());

        bus.publish(BRANDS.drawer, json!({"id": 3, "name": "Acme"}));
        let state = drawer.state();
        assert!(state.open);
        assert_eq!(state.form.text("name"), "Acme");
        assert_eq!(state.record.and_then(|r| r.id), Some("3".to_string()));

        bus.publish(BRANDS.drawer, json!(NEW_RECORD));
        let state = drawer.state();
        assert!(state.record.is_none());
        assert_eq!(state.form.text("name"), "");
    }

    #[test]
    fn other_topics_do_not_open_it() {
        let bus = EventBus::new();
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        bus.publish("drawer:users:edit", json!(NEW_RECORD));
        assert!(!drawer.is_open());
    }

    #[test]
    fn save_validates_presence_before_any_request() {
        let bus = EventBus::new();
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        bus.publish(BRANDS.drawer, json!(NEW_RECORD));

        assert!(drawer.begin_save().is_none());
        assert_eq!(drawer.state().error.as_deref(), Some("Name is required"));
        assert!(!drawer.is_processing());
    }

    #[test]
    fn duplicate_submissions_are_ignored_while_processing() {
        let bus = EventBus::new();
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        bus.publish(BRANDS.drawer, json!({"id": "9", "name": "Acme"}));

        let request = drawer.begin_save().expect("first save goes out");
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.endpoint, "/brands/9");
        assert!(drawer.is_processing());
        assert!(drawer.begin_save().is_none());
    }

    #[test]
    fn success_publishes_reload_and_closes() {
        let bus = EventBus::new();
        let reloads = reload_counter(&bus, BRANDS.reload);
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        bus.publish(BRANDS.drawer, json!(NEW_RECORD));
        drawer.set_field("name", "Acme");

        let request = drawer.begin_save().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.data, Some(json!({"name": "Acme"})));

        let settled = drawer.finish(Ok(json!({"id": 1})));
        assert_eq!(settled, Settled::Saved("Brand created".to_string()));
        assert_eq!(reloads.get(), 1);
        assert!(!drawer.is_open());
    }

    #[test]
    fn failure_keeps_the_drawer_open_with_the_server_message() {
        let bus = EventBus::new();
        let reloads = reload_counter(&bus, BRANDS.reload);
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        bus.publish(BRANDS.drawer, json!({"id": "9", "name": "Acme"}));
        drawer.begin_save().unwrap();

        drawer.finish(Err(ApiError::Http { status: 409, message: Some("Name taken".to_string()) }));
        let state = drawer.state();
        assert!(state.open);
        assert!(!state.is_processing);
        assert_eq!(state.error.as_deref(), Some("Name taken"));
        assert_eq!(reloads.get(), 0);

        // Retry is possible after a failure
        assert!(drawer.begin_save().is_some());
    }

    #[test]
    fn new_records_start_from_defaults() {
        let bus = EventBus::new();
        let mut defaults = Map::new();
        defaults.insert("brandId".to_string(), json!("b1"));
        let drawer = DrawerController::<Campaign>::with_defaults(
            &bus,
            BRAND_CAMPAIGNS,
            endpoints::brand_campaigns("b1"),
            defaults,
        );
        bus.publish(BRAND_CAMPAIGNS.drawer, json!(NEW_RECORD));
        assert_eq!(drawer.state().form.text("brandId"), "b1");
    }

    #[test]
    fn look_drawer_changes_the_creator() {
        let bus = EventBus::new();
        let drawer = DrawerController::<Look>::new(&bus, LOOKS, endpoints::looks());
        bus.publish(LOOKS.drawer, json!({"id": "l5", "title": "Summer", "creatorId": "c1"}));
        drawer.set_field("creatorId", "c2");

        let request = drawer.begin_save().unwrap();
        assert_eq!(request.endpoint, "/looks/l5/change-creator");
        assert_eq!(request.data, Some(json!({"creatorId": "c2"})));
    }

    #[test]
    fn dropping_the_controller_unsubscribes() {
        let bus = EventBus::new();
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        assert_eq!(bus.subscriber_count(BRANDS.drawer), 1);
        drop(drawer);
        assert_eq!(bus.subscriber_count(BRANDS.drawer), 0);
    }

    #[test]
    fn confirmation_deletes_and_publishes_reload() {
        let bus = EventBus::new();
        let reloads = reload_counter(&bus, BRAND_CAMPAIGNS.reload);
        let confirm = ConfirmationController::<Campaign>::new(&bus, BRAND_CAMPAIGNS, endpoints::brand_campaigns("b1"));

        bus.publish(BRAND_CAMPAIGNS.confirmation, json!({"id": 7, "name": "Spring"}));
        assert!(confirm.is_open());

        let request = confirm.begin_confirm().unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.endpoint, "/campaigns/ad-campaigns/7");
        assert!(confirm.begin_confirm().is_none());

        assert_eq!(confirm.finish(Ok(Value::Null)), Settled::Saved("Campaign deleted".to_string()));
        assert_eq!(reloads.get(), 1);
        assert!(!confirm.is_open());
    }

    #[test]
    fn confirmation_ignores_records_without_id() {
        let bus = EventBus::new();
        let confirm = ConfirmationController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        bus.publish(BRANDS.confirmation, json!({"name": "Ghost"}));
        assert!(!confirm.is_open());
    }

    #[test]
    fn open_requests_are_ignored_while_a_save_is_in_flight() {
        let bus = EventBus::new();
        let reloads = reload_counter(&bus, BRANDS.reload);
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        bus.publish(BRANDS.drawer, json!({"id": "1", "name": "Acme"}));
        drawer.begin_save().unwrap();

        bus.publish(BRANDS.drawer, json!({"id": "2", "name": "Globex"}));
        let state = drawer.state();
        assert!(state.is_processing);
        assert_eq!(state.record.and_then(|r| r.id), Some("1".to_string()));
        assert!(drawer.begin_save().is_none());

        assert_eq!(drawer.finish(Ok(json!({"id": "1"}))), Settled::Saved("Brand updated".to_string()));
        assert!(!drawer.is_open());
        assert_eq!(reloads.get(), 1);
    }

    #[test]
    fn confirmation_keeps_its_record_while_deleting() {
        let bus = EventBus::new();
        let confirm = ConfirmationController::<Campaign>::new(&bus, BRAND_CAMPAIGNS, endpoints::brand_campaigns("b1"));
        bus.publish(BRAND_CAMPAIGNS.confirmation, json!({"id": 7, "name": "Spring"}));
        confirm.begin_confirm().unwrap();

        bus.publish(BRAND_CAMPAIGNS.confirmation, json!({"id": 8, "name": "Autumn"}));
        let state = confirm.state();
        assert!(state.is_processing);
        assert_eq!(state.record.and_then(|r| r.id), Some("7".to_string()));
        assert!(confirm.begin_confirm().is_none());
    }

    #[test]
    fn detach_releases_views_holding_the_controllers() {
        let bus = EventBus::new();
        let drawer = DrawerController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        let confirm = ConfirmationController::<Brand>::new(&bus, BRANDS, endpoints::brands());
        let repaint_drawer = drawer.clone();
        drawer.subscribe(move || {
            let _ = repaint_drawer.state();
        });
        let repaint_confirm = confirm.clone();
        confirm.subscribe(move || {
            let _ = repaint_confirm.state();
        });
        let drawer_weak = Rc::downgrade(&drawer.inner);
        let confirm_weak = Rc::downgrade(&confirm.inner);

        drawer.detach();
        confirm.detach();
        drop(drawer);
        drop(confirm);
        assert!(drawer_weak.upgrade().is_none());
        assert!(confirm_weak.upgrade().is_none());
        assert_eq!(bus.subscriber_count(BRANDS.drawer), 0);
    }
}
