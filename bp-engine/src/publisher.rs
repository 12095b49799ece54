//! Fan-out of values to subscribed listeners.

use crate::lock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Delivers each published value to every current listener, in
/// subscription order.
///
/// Listeners are invoked outside the lock, so a listener may subscribe,
/// unsubscribe, or publish again without deadlocking. Delivery is a plain
/// loop: a panicking listener stops the rest of that pass.
pub(crate) struct Publisher<T> {
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_id: AtomicU64,
}

impl<T> Publisher<T> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self, listener: Listener<T>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        lock(&self.listeners).retain(|(i, _)| *i != id);
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.listeners).is_empty()
    }

    pub fn publish(&self, value: &T) {
        let listeners: Vec<Listener<T>> = lock(&self.listeners)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(value);
        }
    }
}

/// Handle returned by every subscription. Call [`Disconnect::disconnect`]
/// to unsubscribe; dropping the handle leaves the subscription in place.
#[must_use = "dropping a Disconnect does not unsubscribe"]
pub struct Disconnect(Box<dyn FnOnce() + Send>);

impl Disconnect {
    /// Wrap an arbitrary teardown action.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self(Box::new(f))
    }

    /// A handle that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Unsubscribe.
    pub fn disconnect(self) {
        (self.0)()
    }
}

impl std::fmt::Debug for Disconnect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Disconnect(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_subscription_order_until_unsubscribed() {
        let publisher = Publisher::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = Arc::clone(&seen);
        let b = Arc::clone(&seen);
        let first = publisher.subscribe(Arc::new(move |v: &u32| a.lock().unwrap().push(("a", *v))));
        publisher.subscribe(Arc::new(move |v: &u32| b.lock().unwrap().push(("b", *v))));

        publisher.publish(&1);
        publisher.unsubscribe(first);
        publisher.publish(&2);

        assert_eq!(*seen.lock().unwrap(), vec![("a", 1), ("b", 1), ("b", 2)]);
        assert!(!publisher.is_empty());
    }
}
