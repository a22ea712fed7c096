// ============================================================================
// LIST VIEWMODEL - paginated, searchable table state
// ============================================================================
// Search, page and limit mirror the URL query. Every fetch takes a sequence
// ticket and only the response for the newest ticket is applied, so a slow
// early response can never overwrite a later one.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use crate::config::CONFIG;
use crate::events::topics::REFRESH_DATA;
use crate::events::{EventBus, Subscription};
use crate::models::{ListPage, ListQuery, Pagination};
use crate::router::{current_query, replace_query};
use crate::services::resource_service;
use crate::services::{ApiClient, ApiError, Endpoints};
use crate::state::Subscribers;
use crate::utils::query::{get_param, merge_params};
use crate::viewmodels::debounce::Debouncer;
use crate::viewmodels::resource::Resource;

/// Handed to the loader; passed back with the result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: ListQuery,
}

/// Starts a fetch for the ticket and eventually calls `ListViewModel::apply`
pub type Loader<R> = Rc<dyn Fn(ListViewModel<R>, FetchTicket)>;

/// Receives `(param, value)` updates; `None` removes the param
pub type UrlSink = Rc<dyn Fn(Vec<(String, Option<String>)>)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Empty,
    Rows,
    Error,
}

#[derive(Clone)]
pub struct ListState<R> {
    pub rows: Vec<R>,
    pub pagination: Pagination,
    pub search: String,
    pub loading: bool,
    /// Last failure; rows from the previous success are kept
    pub error: Option<String>,
}

impl<R> ListState<R> {
    pub fn status(&self) -> ListStatus {
        if !self.rows.is_empty() {
            ListStatus::Rows
        } else if self.loading {
            ListStatus::Loading
        } else if self.error.is_some() {
            ListStatus::Error
        } else {
            ListStatus::Empty
        }
    }
}

struct ListInner<R> {
    state: RefCell<ListState<R>>,
    default_limit: u32,
    /// Namespaces URL params when a page shows several lists
    prefix: String,
    seq: Cell<u64>,
    detached: Cell<bool>,
    loader: RefCell<Option<Loader<R>>>,
    url_sink: RefCell<Option<UrlSink>>,
    debouncer: Debouncer<String>,
    subscribers: Subscribers,
    subscriptions: RefCell<Vec<Subscription>>,
}

pub struct ListViewModel<R> {
    inner: Rc<ListInner<R>>,
}

impl<R> Clone for ListViewModel<R> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<R: Resource> ListViewModel<R> {
    pub fn new(prefix: &str) -> Self {
        Self::with_limit(prefix, CONFIG.list_config.default_page_limit)
    }

    pub fn with_limit(prefix: &str, default_limit: u32) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<ListInner<R>>| {
            let weak = weak.clone();
            ListInner {
                state: RefCell::new(ListState {
                    rows: Vec::new(),
                    pagination: Pagination::new(default_limit),
                    search: String::new(),
                    loading: false,
                    error: None,
                }),
                default_limit: default_limit.max(1),
                prefix: prefix.to_string(),
                seq: Cell::new(0),
                detached: Cell::new(false),
                loader: RefCell::new(None),
                url_sink: RefCell::new(None),
                debouncer: Debouncer::new(CONFIG.timing.search_debounce_ms, move |text: String| {
                    if let Some(inner) = weak.upgrade() {
                        ListViewModel { inner }.apply_search(&text);
                    }
                }),
                subscribers: Subscribers::default(),
                subscriptions: RefCell::new(Vec::new()),
            }
        });
        Self { inner }
    }

    pub fn set_loader(&self, loader: Loader<R>) {
        *self.inner.loader.borrow_mut() = Some(loader);
    }

    /// Fetch through the API client against `endpoints`
    pub fn use_remote(&self, api: ApiClient, endpoints: Endpoints) {
        let loader: Loader<R> = Rc::new(move |list: ListViewModel<R>, ticket: FetchTicket| {
            let api = api.clone();
            let endpoints = endpoints.clone();
            spawn_local(async move {
                let result = resource_service::fetch_page::<R>(&api, &endpoints, &ticket.query).await;
                list.apply(&ticket, result);
            });
        });
        self.set_loader(loader);
    }

    pub fn set_url_sink(&self, sink: UrlSink) {
        *self.inner.url_sink.borrow_mut() = Some(sink);
    }

    /// Mirror list params into `window.location` and read the initial ones from it
    pub fn bind_location(&self) {
        self.init_from_query(&current_query());
        self.set_url_sink(Rc::new(|updates: Vec<(String, Option<String>)>| {
            let updates: Vec<(&str, Option<String>)> =
                updates.iter().map(|(key, value)| (key.as_str(), value.clone())).collect();
            replace_query(&merge_params(&current_query(), &updates));
        }));
    }

    fn param(&self, name: &str) -> String {
        format!("{}{}", self.inner.prefix, name)
    }

    /// Restore search/page/limit from a query string; bad values fall back
    pub fn init_from_query(&self, query: &str) {
        let search = get_param(query, &self.param("search")).unwrap_or_default();
        let page = get_param(query, &self.param("page"))
            .and_then(|page| page.parse::<u32>().ok())
            .unwrap_or(1);
        let limit = get_param(query, &self.param("limit"))
            .and_then(|limit| limit.parse::<u32>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(self.inner.default_limit);

        let mut state = self.inner.state.borrow_mut();
        state.search = search.trim().to_string();
        state.pagination.on_paginate(page, limit);
    }

    /// Params to write back; defaults are removed to keep URLs short
    pub fn url_params(&self) -> Vec<(String, Option<String>)> {
        let state = self.inner.state.borrow();
        let pagination = state.pagination;
        vec![
            (
                self.param("search"),
                Some(state.search.clone()).filter(|search| !search.is_empty()),
            ),
            (
                self.param("page"),
                Some(pagination.page()).filter(|page| *page > 1).map(|page| page.to_string()),
            ),
            (
                self.param("limit"),
                Some(pagination.limit())
                    .filter(|limit| *limit != self.inner.default_limit)
                    .map(|limit| limit.to_string()),
            ),
        ]
    }

    /// Refetch on `refresh:data` and on the entity's own reload topic
    pub fn attach(&self, bus: &EventBus, reload_topic: &str) {
        let mut subscriptions = self.inner.subscriptions.borrow_mut();
        for topic in [REFRESH_DATA, reload_topic] {
            let weak = Rc::downgrade(&self.inner);
            subscriptions.push(bus.subscribe(topic, move |_detail: &Value| {
                if let Some(inner) = weak.upgrade() {
                    ListViewModel { inner }.fetch();
                }
            }));
        }
    }

    /// Stop reacting to topics, timers and the URL once the page is gone
    pub fn detach(&self) {
        self.inner.detached.set(true);
        self.inner.subscriptions.borrow_mut().clear();
        self.inner.loader.borrow_mut().take();
        self.inner.url_sink.borrow_mut().take();
        self.inner.debouncer.cancel();
        // Views subscribe closures holding this list; release them
        self.inner.subscribers.clear();
    }

    /// Take a new ticket and mark loading. Earlier tickets become stale.
    pub fn begin_fetch(&self) -> FetchTicket {
        let seq = self.inner.seq.get() + 1;
        self.inner.seq.set(seq);
        let query = {
            let mut state = self.inner.state.borrow_mut();
            state.loading = true;
            ListQuery {
                search: Some(state.search.clone()).filter(|search| !search.is_empty()),
                offset: state.pagination.offset(),
                limit: state.pagination.limit(),
            }
        };
        self.inner.subscribers.notify();
        FetchTicket { seq, query }
    }

    pub fn fetch(&self) {
        if self.inner.detached.get() {
            return;
        }
        let ticket = self.begin_fetch();
        log::debug!("📋 [LIST] {} fetch #{} {:?}", R::LABEL, ticket.seq, ticket.query);

        let sink = self.inner.url_sink.borrow().clone();
        if let Some(sink) = sink {
            sink(self.url_params());
        }

        let loader = self.inner.loader.borrow().clone();
        match loader {
            Some(loader) => loader(self.clone(), ticket),
            None => log::warn!("⚠️ [LIST] {} has no loader", R::LABEL),
        }
    }

    /// Apply a fetch result. Returns false when the ticket is stale.
    pub fn apply(&self, ticket: &FetchTicket, result: Result<ListPage<R>, ApiError>) -> bool {
        if ticket.seq != self.inner.seq.get() {
            log::debug!(
                "⏭️ [LIST] {} dropped stale response #{} (latest #{})",
                R::LABEL,
                ticket.seq,
                self.inner.seq.get()
            );
            return false;
        }

        let overshoot = {
            let mut state = self.inner.state.borrow_mut();
            state.loading = false;
            match result {
                Ok(page) => {
                    state.pagination.set_total(page.total);
                    state.rows = page.rows;
                    state.error = None;
                }
                Err(error) => {
                    log::warn!("⚠️ [LIST] {} fetch failed: {}", R::LABEL, error);
                    state.error = Some(error.user_message());
                }
            }
            // A delete can empty the last page; step back to the new last one
            let pagination = state.pagination;
            state.rows.is_empty() && pagination.total() > 0 && pagination.page() > pagination.page_count()
        };
        self.inner.subscribers.notify();

        if overshoot {
            let last = self.inner.state.borrow().pagination.page_count();
            self.go_to_page(last);
        }
        true
    }

    pub fn on_paginate(&self, page: u32, limit: u32) {
        self.inner.state.borrow_mut().pagination.on_paginate(page, limit);
        self.fetch();
    }

    pub fn go_to_page(&self, page: u32) {
        let limit = self.inner.state.borrow().pagination.limit();
        self.on_paginate(page, limit);
    }

    /// Keystroke entry point; settles after the debounce window
    pub fn input_search(&self, text: String) {
        self.inner.debouncer.input(text);
    }

    /// Set the search term and reload from page 1. No-op when unchanged.
    pub fn apply_search(&self, text: &str) {
        let text = text.trim();
        {
            let mut state = self.inner.state.borrow_mut();
            if state.search == text {
                return;
            }
            state.search = text.to_string();
            state.pagination.reset();
        }
        self.fetch();
    }

    pub fn state(&self) -> ListState<R> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.subscribers.add(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::topics::{BRAND_ADS, BRAND_CAMPAIGNS, USERS};
    use crate::models::{Advertisement, Campaign, User};
    use crate::services::endpoints;
    use crate::viewmodels::controller::ConfirmationController;
    use serde_json::json;

    fn users(names: &[&str]) -> ListPage<User> {
        ListPage {
            rows: names
                .iter()
                .map(|name| serde_json::from_value(json!({"firstName": name})).unwrap())
                .collect(),
            total: names.len() as u64,
        }
    }

    /// Loader that only records tickets; tests apply results by hand
    fn recording<R: Resource>(list: &ListViewModel<R>) -> Rc<RefCell<Vec<FetchTicket>>> {
        let tickets = Rc::new(RefCell::new(Vec::new()));
        let seen = tickets.clone();
        list.set_loader(Rc::new(move |_list: ListViewModel<R>, ticket: FetchTicket| {
            seen.borrow_mut().push(ticket);
        }));
        tickets
    }

    #[test]
    fn stale_responses_are_discarded() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let first = list.begin_fetch();
        let second = list.begin_fetch();

        assert!(list.apply(&second, Ok(users(&["Bea"]))));
        assert!(!list.apply(&first, Ok(users(&["Al"]))));

        let state = list.state();
        assert_eq!(state.rows[0].first_name.as_deref(), Some("Bea"));
        assert!(!state.loading);
    }

    #[test]
    fn errors_keep_the_previous_rows() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let ticket = list.begin_fetch();
        list.apply(&ticket, Ok(users(&["Al", "Bea"])));

        let ticket = list.begin_fetch();
        list.apply(&ticket, Err(ApiError::Network("offline".to_string())));
        let state = list.state();
        assert_eq!(state.rows.len(), 2);
        assert!(state.error.is_some());
        assert_eq!(state.status(), ListStatus::Rows);
    }

    #[test]
    fn status_covers_loading_empty_and_error() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let ticket = list.begin_fetch();
        assert_eq!(list.state().status(), ListStatus::Loading);

        list.apply(&ticket, Ok(ListPage::default()));
        assert_eq!(list.state().status(), ListStatus::Empty);

        let ticket = list.begin_fetch();
        list.apply(&ticket, Err(ApiError::Http { status: 500, message: None }));
        assert_eq!(list.state().status(), ListStatus::Error);
    }

    #[test]
    fn pagination_changes_drive_the_query() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let tickets = recording(&list);

        list.on_paginate(3, 10);
        let ticket = tickets.borrow().last().cloned().unwrap();
        assert_eq!(ticket.query, ListQuery { search: None, offset: 20, limit: 10 });
    }

    #[test]
    fn search_resets_to_the_first_page_and_ignores_repeats() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let tickets = recording(&list);
        list.go_to_page(4);

        list.apply_search("  ada ");
        let ticket = tickets.borrow().last().cloned().unwrap();
        assert_eq!(ticket.query.search.as_deref(), Some("ada"));
        assert_eq!(ticket.query.offset, 0);

        list.apply_search("ada");
        assert_eq!(tickets.borrow().len(), 2);
    }

    #[test]
    fn url_round_trip_with_prefix() {
        let list = ListViewModel::<User>::with_limit("ads_", 20);
        list.init_from_query("?tab=ads&ads_search=spring&ads_page=3&ads_limit=50&page=9");
        let state = list.state();
        assert_eq!(state.search, "spring");
        assert_eq!(state.pagination.page(), 3);
        assert_eq!(state.pagination.offset(), 100);

        assert_eq!(
            list.url_params(),
            vec![
                ("ads_search".to_string(), Some("spring".to_string())),
                ("ads_page".to_string(), Some("3".to_string())),
                ("ads_limit".to_string(), Some("50".to_string())),
            ]
        );
    }

    #[test]
    fn bad_url_values_fall_back_to_defaults() {
        let list = ListViewModel::<User>::with_limit("", 20);
        list.init_from_query("page=zero&limit=0");
        let state = list.state();
        assert_eq!(state.pagination.page(), 1);
        assert_eq!(state.pagination.limit(), 20);
        assert!(list.url_params().iter().all(|(_, value)| value.is_none()));
    }

    #[test]
    fn fetch_pushes_params_to_the_url_sink() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let _tickets = recording(&list);
        let written = Rc::new(RefCell::new(Vec::new()));
        let sink = written.clone();
        list.set_url_sink(Rc::new(move |updates| sink.borrow_mut().push(updates)));

        list.go_to_page(2);
        let last = written.borrow().last().cloned().unwrap();
        assert!(last.contains(&("page".to_string(), Some("2".to_string()))));
    }

    #[test]
    fn emptied_last_page_steps_back() {
        let list = ListViewModel::<User>::with_limit("", 10);
        let tickets = recording(&list);
        list.go_to_page(3);

        let ticket = tickets.borrow().last().cloned().unwrap();
        list.apply(&ticket, Ok(ListPage { rows: Vec::new(), total: 20 }));

        assert_eq!(list.state().pagination.page(), 2);
        assert_eq!(tickets.borrow().len(), 2);
    }

    #[test]
    fn refresh_and_reload_topics_trigger_a_fetch() {
        let bus = EventBus::new();
        let list = ListViewModel::<User>::with_limit("", 20);
        let tickets = recording(&list);
        list.attach(&bus, USERS.reload);

        bus.publish(REFRESH_DATA, Value::Null);
        bus.publish(USERS.reload, Value::Null);
        bus.publish("reload:brands", Value::Null);
        assert_eq!(tickets.borrow().len(), 2);

        list.detach();
        assert_eq!(bus.subscriber_count(USERS.reload), 0);
        list.apply_search("late keystroke");
        assert_eq!(tickets.borrow().len(), 2);
    }

    #[test]
    fn settled_keystrokes_fetch_once_with_the_final_term() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let tickets = recording(&list);
        list.go_to_page(3);
        tickets.borrow_mut().clear();

        let typed: Vec<u64> = ["r", "re", "red"]
            .into_iter()
            .map(|text| list.inner.debouncer.push(text.to_string()))
            .collect();
        for ticket in &typed {
            list.inner.debouncer.settle(*ticket);
        }

        let fetched = tickets.borrow().clone();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].query, ListQuery { search: Some("red".to_string()), offset: 0, limit: 20 });
        assert_eq!(list.state().pagination.page(), 1);
    }

    #[test]
    fn detach_cancels_a_pending_search() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let tickets = recording(&list);
        let ticket = list.inner.debouncer.push("late".to_string());

        list.detach();
        list.inner.debouncer.settle(ticket);
        assert!(tickets.borrow().is_empty());
        assert_eq!(list.state().search, "");
    }

    #[test]
    fn detach_releases_views_holding_the_list() {
        let list = ListViewModel::<User>::with_limit("", 20);
        let repaint = list.clone();
        list.subscribe(move || {
            let _ = repaint.state();
        });
        let weak = Rc::downgrade(&list.inner);

        list.detach();
        drop(list);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn deleting_a_campaign_reloads_the_ads_list() {
        let bus = EventBus::new();
        let ads = ListViewModel::<Advertisement>::with_limit("ads_", 20);
        let tickets = recording(&ads);
        ads.attach(&bus, BRAND_ADS.reload);

        let confirm = ConfirmationController::<Campaign>::new(&bus, BRAND_CAMPAIGNS, endpoints::brand_campaigns("b1"));
        bus.publish(BRAND_CAMPAIGNS.confirmation, json!({"id": 7, "name": "Spring"}));
        let request = confirm.begin_confirm().unwrap();
        assert_eq!(request.endpoint, "/campaigns/ad-campaigns/7");

        confirm.finish(Ok(Value::Null));
        assert_eq!(tickets.borrow().len(), 1);
    }
}
