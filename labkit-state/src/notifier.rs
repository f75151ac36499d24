//! Observer fan-out with explicit subscription handles.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use tracing::trace;

use crate::event::{StateEvent, SubscriptionId};

/// Callback invoked for every delivered event.
pub type Listener = Box<dyn FnMut(&StateEvent)>;

#[derive(Default)]
struct NotifierInner {
    next_id: u64,
    live: BTreeSet<SubscriptionId>,
    listeners: Vec<(SubscriptionId, Listener)>,
    queue: VecDeque<StateEvent>,
    delivering: bool,
}

/// Delivers events to subscribed listeners on the current thread.
///
/// Listeners may subscribe or unsubscribe (themselves or others) while an event
/// is being delivered. A listener removed mid-delivery receives nothing
/// further; a listener added mid-delivery starts with the next event. Events
/// emitted from inside a listener are queued and delivered after the current
/// event has reached every listener, so each cycle completes before the next
/// begins.
#[derive(Default)]
pub struct Notifier {
    inner: RefCell<NotifierInner>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Notifier")
            .field("subscribers", &inner.live.len())
            .field("queued", &inner.queue.len())
            .finish()
    }
}

impl Notifier {
    /// Creates a notifier without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`, returning the handle used to remove it.
    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = SubscriptionId::new(inner.next_id);
        inner.live.insert(id);
        inner.listeners.push((id, listener));
        trace!(%id, "listener subscribed");
        id
    }

    /// Removes a listener. Returns `false` if the handle was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.live.remove(&id) {
            return false;
        }
        inner.listeners.retain(|(candidate, _)| *candidate != id);
        trace!(%id, "listener unsubscribed");
        true
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    /// Delivers a single event.
    pub fn emit(&self, event: StateEvent) {
        self.emit_all([event]);
    }

    /// Delivers `events` in order.
    pub fn emit_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = StateEvent>,
    {
        {
            let mut inner = self.inner.borrow_mut();
            inner.queue.extend(events);
            if inner.delivering {
                return;
            }
            inner.delivering = true;
        }

        loop {
            let (event, mut active) = {
                let mut inner = self.inner.borrow_mut();
                let Some(event) = inner.queue.pop_front() else {
                    inner.delivering = false;
                    break;
                };
                let active = std::mem::take(&mut inner.listeners);
                (event, active)
            };

            for (id, listener) in &mut active {
                if self.inner.borrow().live.contains(id) {
                    listener(&event);
                }
            }

            let mut inner = self.inner.borrow_mut();
            let added = std::mem::take(&mut inner.listeners);
            active.extend(added);
            active.retain(|(id, _)| inner.live.contains(id));
            inner.listeners = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    fn changed(field: &'static str) -> StateEvent {
        StateEvent::StateChanged { field }
    }

    #[test]
    fn delivers_to_every_listener() {
        let notifier = Notifier::new();
        let hits = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let hits = Rc::clone(&hits);
            notifier.subscribe(Box::new(move |_| hits.set(hits.get() + 1)));
        }
        notifier.emit(changed("x"));
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let notifier = Notifier::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = notifier.subscribe(Box::new(move |_| counter.set(counter.get() + 1)));

        notifier.emit(changed("x"));
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(changed("x"));

        assert_eq!(hits.get(), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn listener_can_remove_a_later_listener_mid_delivery() {
        let notifier = Rc::new(Notifier::new());
        let second_hits = Rc::new(Cell::new(0));
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let weak = Rc::downgrade(&notifier);
        let target = Rc::clone(&victim);
        notifier.subscribe(Box::new(move |_| {
            if let (Some(n), Some(id)) = (weak.upgrade(), target.get()) {
                n.unsubscribe(id);
            }
        }));
        let hits = Rc::clone(&second_hits);
        let id = notifier.subscribe(Box::new(move |_| hits.set(hits.get() + 1)));
        victim.set(Some(id));

        notifier.emit(changed("x"));
        notifier.emit(changed("y"));
        assert_eq!(second_hits.get(), 0);
        assert_eq!(notifier.subscriber_count(), 1);
    }

    #[test]
    fn listener_added_mid_delivery_starts_with_next_event() {
        let notifier = Rc::new(Notifier::new());
        let late_events = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&notifier);
        let sink = Rc::clone(&late_events);
        let added = Rc::new(Cell::new(false));
        notifier.subscribe(Box::new(move |_| {
            if added.replace(true) {
                return;
            }
            if let Some(n) = weak.upgrade() {
                let sink = Rc::clone(&sink);
                n.subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));
            }
        }));

        notifier.emit(changed("first"));
        notifier.emit(changed("second"));
        assert_eq!(*late_events.borrow(), vec![changed("second")]);
    }

    #[test]
    fn nested_emits_are_queued_in_order() {
        let notifier = Rc::new(Notifier::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&notifier);
        notifier.subscribe(Box::new(move |event| {
            if *event == changed("outer") {
                if let Some(n) = weak.upgrade() {
                    n.emit(changed("inner"));
                }
            }
        }));
        let log = Rc::clone(&seen);
        notifier.subscribe(Box::new(move |event| log.borrow_mut().push(event.clone())));

        notifier.emit(changed("outer"));
        assert_eq!(*seen.borrow(), vec![changed("outer"), changed("inner")]);
    }
}
