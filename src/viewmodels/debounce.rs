// ============================================================================
// DEBOUNCE - last input wins
// ============================================================================
// Each input replaces (and so clears) the previous timer. Inputs also take a
// ticket, and a timer only delivers when its ticket is still the newest.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Timer-free debounce state
#[derive(Debug)]
pub struct Debounce<T> {
    latest: u64,
    pending: Option<T>,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self { latest: 0, pending: None }
    }
}

impl<T> Debounce<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an input; any earlier ticket becomes stale
    pub fn push(&mut self, value: T) -> u64 {
        self.latest += 1;
        self.pending = Some(value);
        self.latest
    }

    /// Deliver the pending value if `ticket` is the newest. Delivers at most once.
    pub fn fire(&mut self, ticket: u64) -> Option<T> {
        if ticket != self.latest {
            return None;
        }
        self.pending.take()
    }

    /// Invalidate every outstanding ticket
    pub fn push_none(&mut self) {
        self.latest += 1;
        self.pending = None;
    }
}

/// Browser debouncer built on `gloo_timers`
pub struct Debouncer<T> {
    state: Rc<RefCell<Debounce<T>>>,
    delay_ms: u32,
    on_settle: Rc<dyn Fn(T)>,
    timer: Rc<RefCell<Option<Timeout>>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            delay_ms: self.delay_ms,
            on_settle: self.on_settle.clone(),
            timer: self.timer.clone(),
        }
    }
}

impl<T: 'static> Debouncer<T> {
    pub fn new<F>(delay_ms: u32, on_settle: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        Self {
            state: Rc::new(RefCell::new(Debounce::new())),
            delay_ms,
            on_settle: Rc::new(on_settle),
            timer: Rc::new(RefCell::new(None)),
        }
    }

    /// Restart the timer with `value` as the pending input
    pub fn input(&self, value: T) {
        let ticket = self.push(value);
        let state = self.state.clone();
        let on_settle = self.on_settle.clone();
        let timeout = Timeout::new(self.delay_ms, move || deliver(&state, &on_settle, ticket));
        // Dropping the previous Timeout clears it
        let previous = self.timer.borrow_mut().replace(timeout);
        drop(previous);
    }

    /// Drop the pending input and its timer
    pub fn cancel(&self) {
        let previous = self.timer.borrow_mut().take();
        drop(previous);
        self.state.borrow_mut().push_none();
    }

    pub(crate) fn push(&self, value: T) -> u64 {
        self.state.borrow_mut().push(value)
    }

    /// Run the settle step for `ticket` as its timer would
    #[cfg(test)]
    pub(crate) fn settle(&self, ticket: u64) {
        deliver(&self.state, &self.on_settle, ticket);
    }
}

fn deliver<T>(state: &RefCell<Debounce<T>>, on_settle: &Rc<dyn Fn(T)>, ticket: u64) {
    // Release the borrow before running the callback
    let settled = state.borrow_mut().fire(ticket);
    if let Some(value) = settled {
        on_settle(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_inputs_deliver_only_the_final_value_once() {
        let mut debounce = Debounce::new();
        let tickets: Vec<u64> = ["r", "re", "red"].into_iter().map(|text| debounce.push(text)).collect();

        // Timers fire in order; only the last ticket delivers
        let delivered: Vec<&str> = tickets.iter().filter_map(|ticket| debounce.fire(*ticket)).collect();
        assert_eq!(delivered, vec!["red"]);
        assert_eq!(debounce.fire(tickets[2]), None);
    }

    #[test]
    fn stale_ticket_after_new_input_delivers_nothing() {
        let mut debounce = Debounce::new();
        let first = debounce.push(1);
        let second = debounce.push(2);

        assert_eq!(debounce.fire(first), None);
        assert_eq!(debounce.fire(second), Some(2));
        assert_eq!(debounce.fire(second), None);
    }

    #[test]
    fn separated_inputs_each_deliver() {
        let mut debounce = Debounce::new();
        let first = debounce.push("a");
        assert_eq!(debounce.fire(first), Some("a"));

        let second = debounce.push("b");
        assert_eq!(debounce.fire(second), Some("b"));
    }

    fn settled_values(delay_ms: u32) -> (Debouncer<String>, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let debouncer = Debouncer::new(delay_ms, move |value: String| sink.borrow_mut().push(value));
        (debouncer, seen)
    }

    #[test]
    fn superseded_timer_delivers_nothing() {
        let (debouncer, seen) = settled_values(300);
        let first = debouncer.push("r".to_string());
        let last = debouncer.push("red".to_string());

        debouncer.settle(first);
        assert!(seen.borrow().is_empty());
        debouncer.settle(last);
        debouncer.settle(last);
        assert_eq!(*seen.borrow(), vec!["red".to_string()]);
    }

    #[test]
    fn cancel_discards_the_pending_input() {
        let (debouncer, seen) = settled_values(300);
        let ticket = debouncer.push("red".to_string());
        debouncer.cancel();

        debouncer.settle(ticket);
        assert!(seen.borrow().is_empty());

        let next = debouncer.push("blue".to_string());
        debouncer.settle(next);
        assert_eq!(*seen.borrow(), vec!["blue".to_string()]);
    }
}
