// ============================================================================
// EVENT BUS - topic -> ordered list of handlers
// ============================================================================
// Dispatch is synchronous: every handler registered on the topic when
// publish() is called runs before publish() returns, in subscription order.
// Nothing is retained, late subscribers never see earlier events.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

type Handler = Rc<dyn Fn(&Value)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    topics: HashMap<String, Vec<(u64, Handler)>>,
}

/// Application-wide publish/subscribe channel keyed by topic name
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `detail` to every current subscriber of `topic`
    pub fn publish(&self, topic: &str, detail: Value) {
        // Snapshot so handlers can publish or (un)subscribe re-entrantly
        let handlers: Vec<Handler> = {
            let registry = self.registry.borrow();
            match registry.topics.get(topic) {
                Some(list) => list.iter().map(|(_, handler)| handler.clone()).collect(),
                None => Vec::new(),
            }
        };

        if handlers.is_empty() {
            log::debug!("📭 [BUS] {} (no subscribers)", topic);
            return;
        }

        log::debug!("📣 [BUS] {} -> {} subscriber(s)", topic, handlers.len());
        for handler in handlers {
            handler(&detail);
        }
    }

    /// Serialize a record and publish it
    pub fn publish_record<T: Serialize>(&self, topic: &str, record: &T) {
        match serde_json::to_value(record) {
            Ok(detail) => self.publish(topic, detail),
            Err(e) => log::error!("❌ [BUS] Could not serialize payload for {}: {}", topic, e),
        }
    }

    /// Register `handler` on `topic`. The handler stays registered until the
    /// returned subscription is dropped.
    #[must_use = "dropping the Subscription unsubscribes the handler"]
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> Subscription
    where
        F: Fn(&Value) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .topics
                .entry(topic.to_string())
                .or_default()
                .push((id, Rc::new(handler)));
            id
        };

        Subscription {
            registry: Rc::downgrade(&self.registry),
            topic: topic.to_string(),
            id,
            active: true,
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry
            .borrow()
            .topics
            .get(topic)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// Decode an event payload into a typed record
pub fn decode_detail<T: DeserializeOwned>(detail: &Value) -> Option<T> {
    match serde_json::from_value(detail.clone()) {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("⚠️ [BUS] Unexpected event payload: {}", e);
            None
        }
    }
}

/// Handle to a registered handler
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    topic: String,
    id: u64,
    active: bool,
}

impl Subscription {
    /// Keep the handler registered for the lifetime of the bus
    pub fn forget(mut self) {
        self.active = false;
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        if let Some(list) = registry.topics.get_mut(&self.topic) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                registry.topics.remove(&self.topic);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&Value)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_for_handlers = log.clone();
        let make = move |name: &str| {
            let log = log_for_handlers.clone();
            let name = name.to_string();
            Box::new(move |detail: &Value| {
                log.borrow_mut().push(format!("{}:{}", name, detail));
            }) as Box<dyn Fn(&Value)>
        };
        (log, make)
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.publish("refresh:data", Value::Null);
        assert_eq!(bus.subscriber_count("refresh:data"), 0);
    }

    #[test]
    fn handlers_receive_the_same_publish_in_subscription_order() {
        let bus = EventBus::new();
        let (log, make) = recorder();

        let _first = bus.subscribe("reload:brand-ads", make("first"));
        let _second = bus.subscribe("reload:brand-ads", make("second"));

        bus.publish("reload:brand-ads", json!(7));

        assert_eq!(*log.borrow(), vec!["first:7".to_string(), "second:7".to_string()]);
    }

    #[test]
    fn unsubscribed_handler_does_not_receive_later_publishes() {
        let bus = EventBus::new();
        let (log, make) = recorder();

        let gone = bus.subscribe("refresh:data", make("gone"));
        let _kept = bus.subscribe("refresh:data", make("kept"));
        drop(gone);

        bus.publish("refresh:data", json!("x"));

        assert_eq!(*log.borrow(), vec!["kept:\"x\"".to_string()]);
        assert_eq!(bus.subscriber_count("refresh:data"), 1);
    }

    #[test]
    fn dropping_the_subscription_unsubscribes() {
        let bus = EventBus::new();
        let (log, make) = recorder();

        {
            let _scoped = bus.subscribe("drawer:users:edit", make("scoped"));
            assert_eq!(bus.subscriber_count("drawer:users:edit"), 1);
        }

        bus.publish("drawer:users:edit", Value::Null);
        assert!(log.borrow().is_empty());
        assert_eq!(bus.subscriber_count("drawer:users:edit"), 0);
    }

    #[test]
    fn forgotten_subscription_stays_registered() {
        let bus = EventBus::new();
        let (log, make) = recorder();

        bus.subscribe("refresh:data", make("app")).forget();
        bus.publish("refresh:data", json!(1));

        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn topics_are_matched_exactly() {
        let bus = EventBus::new();
        let (log, make) = recorder();

        let _sub = bus.subscribe("reload:brand-ads", make("ads"));
        bus.publish("reload:brand", Value::Null);
        bus.publish("reload:brand-ads-extra", Value::Null);

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn handler_may_publish_re_entrantly() {
        let bus = EventBus::new();
        let (log, make) = recorder();

        let inner_bus = bus.clone();
        let _chain = bus.subscribe("confirmation:brand:campaigns:delete", move |_| {
            inner_bus.publish("reload:brand-ads", json!("chained"));
        });
        let _ads = bus.subscribe("reload:brand-ads", make("ads"));

        bus.publish("confirmation:brand:campaigns:delete", json!({"id": 3}));

        assert_eq!(*log.borrow(), vec!["ads:\"chained\"".to_string()]);
    }

    #[test]
    fn subscription_outliving_the_bus_drops_cleanly() {
        let bus = EventBus::new();
        let sub = bus.subscribe("refresh:data", |_| {});
        drop(bus);
        drop(sub);
    }

    #[test]
    fn decode_detail_reads_typed_payloads() {
        #[derive(serde::Deserialize, PartialEq, Debug)]
        struct Payload {
            id: u32,
        }

        assert_eq!(decode_detail::<Payload>(&json!({"id": 4})), Some(Payload { id: 4 }));
        assert_eq!(decode_detail::<Payload>(&json!("new")), None);
    }
}
