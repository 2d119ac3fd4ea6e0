//! Synchronous, ordered, multi-subscriber signals.
//!
//! A [`Signal`] holds a list of observers and delivers every invocation
//! inline on the calling thread, in connection order. There is no queue, no
//! thread hand-off, and no locking; the whole crate assumes a
//! single-threaded, cooperative caller.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use json_settings_signals::Signal;
//!
//! let signal: Signal<i64> = Signal::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let seen_by_observer = Rc::clone(&seen);
//! signal.connect(move |value| seen_by_observer.set(*value));
//!
//! signal.invoke(&42);
//! assert_eq!(seen.get(), 42);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Identifies one observer connected to a [`Signal`].
///
/// Ids increase monotonically per signal, so ordering subscription ids is
/// the same as ordering observers by connection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Observer<A> = Rc<dyn Fn(&A)>;

/// An ordered set of observers invoked synchronously on the calling thread.
///
/// Observers are `Fn`, not `FnMut`: delivery snapshots the observer list and
/// never holds a borrow while calling out, so an observer that re-enters
/// `invoke` on the same signal cannot deadlock or panic the signal itself.
/// Observers that need mutable state capture it behind `Cell`/`RefCell`.
///
/// Dropping the signal releases every subscription.
pub struct Signal<A> {
    next_id: Cell<u64>,
    observers: RefCell<BTreeMap<u64, Observer<A>>>,
}

impl<A> Signal<A> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            observers: RefCell::new(BTreeMap::new()),
        }
    }

    /// Registers an observer; it stays connected until [`disconnect`] is
    /// called with the returned id or the signal is dropped.
    ///
    /// [`disconnect`]: Signal::disconnect
    pub fn connect<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&A) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id.saturating_add(1));
        self.observers.borrow_mut().insert(id, Rc::new(observer));
        SubscriptionId(id)
    }

    /// Removes an observer. Returns false when the id was already gone.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        self.observers.borrow_mut().remove(&id.0).is_some()
    }

    /// Delivers `args` to every observer live at the start of the call, in
    /// connection order, inline on the caller's thread.
    ///
    /// Observers connected during delivery are not invoked until the next
    /// `invoke`; observers disconnected during delivery still receive the
    /// in-flight invocation.
    pub fn invoke(&self, args: &A) {
        let snapshot: Vec<Observer<A>> = self.observers.borrow().values().cloned().collect();
        for observer in snapshot {
            observer(args);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_connection_order() {
        let signal: Signal<()> = Signal::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            signal.connect(move |_| order.borrow_mut().push(tag));
        }

        signal.invoke(&());
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn disconnect_removes_observer() {
        let signal: Signal<u32> = Signal::new();
        let hits = Rc::new(Cell::new(0u32));

        let hits_by_observer = Rc::clone(&hits);
        let id = signal.connect(move |_| hits_by_observer.set(hits_by_observer.get() + 1));

        signal.invoke(&0);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id), "second disconnect must report false");
        signal.invoke(&0);

        assert_eq!(hits.get(), 1);
        assert_eq!(signal.observer_count(), 0);
    }

    #[test]
    fn observer_connected_during_delivery_fires_next_invoke() {
        let signal: Rc<Signal<u32>> = Rc::new(Signal::new());
        let late_hits = Rc::new(Cell::new(0u32));

        {
            let inner = Rc::clone(&signal);
            let late_hits = Rc::clone(&late_hits);
            let connected = Cell::new(false);
            signal.connect(move |_| {
                if !connected.get() {
                    connected.set(true);
                    let late_hits = Rc::clone(&late_hits);
                    inner.connect(move |_| late_hits.set(late_hits.get() + 1));
                }
            });
        }

        signal.invoke(&0);
        assert_eq!(late_hits.get(), 0, "late observer must not see in-flight invoke");
        signal.invoke(&0);
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn reentrant_invoke_does_not_panic() {
        let signal: Rc<Signal<u32>> = Rc::new(Signal::new());
        let deepest = Rc::new(Cell::new(0u32));

        {
            let inner = Rc::clone(&signal);
            let deepest = Rc::clone(&deepest);
            signal.connect(move |value| {
                deepest.set(deepest.get().max(*value));
                if *value < 3 {
                    inner.invoke(&(*value + 1));
                }
            });
        }

        signal.invoke(&1);
        assert_eq!(deepest.get(), 3);
    }

    #[test]
    fn observer_disconnected_during_delivery_still_receives_in_flight_invoke() {
        let signal: Rc<Signal<()>> = Rc::new(Signal::new());
        let victim_hits = Rc::new(Cell::new(0u32));
        let victim_id = Rc::new(Cell::new(None));

        {
            let inner = Rc::clone(&signal);
            let victim_id = Rc::clone(&victim_id);
            signal.connect(move |_| {
                if let Some(id) = victim_id.get() {
                    inner.disconnect(id);
                }
            });
        }
        {
            let victim_hits = Rc::clone(&victim_hits);
            let id = signal.connect(move |_| victim_hits.set(victim_hits.get() + 1));
            victim_id.set(Some(id));
        }

        signal.invoke(&());
        assert_eq!(victim_hits.get(), 1, "in-flight delivery still reaches the victim");
        signal.invoke(&());
        assert_eq!(victim_hits.get(), 1, "victim is gone on the next invoke");
    }
}
