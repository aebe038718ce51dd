//! Latest-value publish/subscribe registry.
//!
//! A `Feed` holds one value. Publishing replaces it and synchronously calls
//! every subscriber; new subscribers are called immediately with the current
//! value. Callbacks run after the state lock is released, so they may read
//! the feed (or anything that reads it) without deadlocking. Deliveries are
//! serialized by a separate lock: concurrent publishers reach every
//! subscriber in the same order the latest value was replaced. A callback
//! must not publish to or subscribe to the feed that is calling it.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct FeedState<T> {
    latest: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

pub struct Feed<T> {
    state: Mutex<FeedState<T>>,
    delivery: Mutex<()>,
}

impl<T: Clone + Send + Sync + 'static> Feed<T> {
    pub fn new(initial: T) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FeedState {
                latest: initial,
                next_id: 0,
                subscribers: Vec::new(),
            }),
            delivery: Mutex::new(()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, FeedState<T>> {
        // A panicking subscriber never holds the lock, so the state is intact
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self) -> T {
        self.lock().latest.clone()
    }

    fn deliver(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn publish(&self, value: T) {
        let _delivering = self.deliver();
        let callbacks: Vec<Callback<T>> = {
            let mut state = self.lock();
            state.latest = value.clone();
            state.subscribers.iter().map(|(_, cb)| cb.clone()).collect()
        };
        for callback in callbacks {
            callback(&value);
        }
    }

    /// Register `callback`. It is invoked at once with the current value and
    /// then on every publish until the returned handle is dropped.
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let _delivering = self.deliver();
        let (id, current) = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, callback.clone()));
            (id, state.latest.clone())
        };
        callback(&current);

        Subscription {
            feed: Arc::downgrade(self),
            id,
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.lock().subscribers.retain(|(sub_id, _)| *sub_id != id);
    }
}

/// Keeps a subscription alive. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription<T: Clone + Send + Sync + 'static> {
    feed: Weak<Feed<T>>,
    id: u64,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl<T: Clone + Send + Sync + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.upgrade() {
            feed.unsubscribe(self.id);
        }
    }
}
