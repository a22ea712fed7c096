// ============================================================================
// REACTIVITY - subscriber lists for state containers
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Shared list of change callbacks. Clones share the same list.
#[derive(Clone, Default)]
pub struct Subscribers {
    callbacks: Rc<RefCell<Vec<Callback>>>,
}

impl Subscribers {
    pub fn add<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.callbacks.borrow_mut().push(Rc::new(callback));
    }

    /// Run every callback. Callbacks may subscribe further without panicking;
    /// those only see the next notification.
    pub fn notify(&self) {
        let callbacks: Vec<Callback> = self.callbacks.borrow().clone();
        for callback in callbacks {
            callback();
        }
    }

    /// Drop every callback (and whatever they captured)
    pub fn clear(&self) {
        self.callbacks.borrow_mut().clear();
    }
}

/// Single value with change notification
#[derive(Clone)]
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Subscribers,
}

impl<T: Clone> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Subscribers::default(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.subscribers.notify();
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
    use std::cell::Cell;

    #[test]
    fn clones_share_value_and_subscribers() {
        let state = ReactiveState::new(1);
        let seen = Rc::new(Cell::new(0));
        let seen_in_cb = seen.clone();
        let observed = state.clone();
        state.subscribe(move || seen_in_cb.set(observed.get()));

        let other = state.clone();
        other.set(5);
        assert_eq!(seen.get(), 5);

        assert_eq!(state.get(), 5);
    }

    #[test]
    fn subscribing_during_notify_does_not_panic() {
        let subscribers = Subscribers::default();
        let calls = Rc::new(Cell::new(0));
        let inner = subscribers.clone();
        let counter = calls.clone();
        subscribers.add(move || {
            let counter = counter.clone();
            inner.add(move || counter.set(counter.get() + 1));
        });

        subscribers.notify();
        assert_eq!(calls.get(), 0);
        subscribers.notify();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn clear_releases_captured_state() {
        let subscribers = Subscribers::default();
        let owned = Rc::new(());
        let weak = Rc::downgrade(&owned);
        subscribers.add(move || {
            let _ = &owned;
        });

        assert!(weak.upgrade().is_some());
        subscribers.clear();
        assert!(weak.upgrade().is_none());
    }
}
