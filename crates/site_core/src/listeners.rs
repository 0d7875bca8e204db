//! Explicit change notification for view state.
//!
//! Views own a [`ListenerSet`] and call [`ListenerSet::notify`] after every
//! mutation. Subscribers keep the returned [`Subscription`] for as long as
//! they want updates; disposing or dropping it removes the listener.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Slots<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

pub struct ListenerSet<T> {
    slots: Arc<Mutex<Slots<T>>>,
}

impl<T: 'static> ListenerSet<T> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut slots = lock(&self.slots);
            let id = slots.next_id;
            slots.next_id += 1;
            slots.listeners.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<Mutex<Slots<T>>> = Arc::downgrade(&self.slots);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(slots) = weak.upgrade() {
                    lock(&slots).listeners.retain(|(slot_id, _)| *slot_id != id);
                }
            })),
        }
    }

    /// Calls every listener with `value`. Listeners run outside the lock, so
    /// they may subscribe or dispose re-entrantly.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = lock(&self.slots)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.slots).listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.slots).listeners.clear();
    }
}

impl<T: 'static> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(slots: &Mutex<Slots<T>>) -> MutexGuard<'_, Slots<T>> {
    slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Disposer returned by [`ListenerSet::subscribe`].
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn dispose(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

#[cfg(test)]
#[path = "tests/listeners_tests.rs"]
mod tests;
