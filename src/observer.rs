//! Observable values with owner-scoped subscriptions.
//!
//! An [`Observable`] holds a value and a list of change callbacks. Subscribing
//! returns a [`Subscription`]; dropping it removes the callback, so an owner
//! that stores its subscriptions can never leave a dangling observer behind.
//!
//! Clones of an `Observable` share the same value and observer list.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    observers: Vec<(u64, Callback<T>)>,
    next_id: u64,
}

/// A shared value that notifies subscribers when it changes
pub struct Observable<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + Send + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }

    /// Replace the value and notify observers. Setting an equal value is
    /// silent.
    pub fn set(&self, value: T) {
        let observers: Vec<Callback<T>> = {
            let mut inner = self.inner.lock();
            if inner.value == value {
                return;
            }
            inner.value = value.clone();
            inner.observers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        // Callbacks run without the lock held so they may read or subscribe
        for callback in observers {
            callback(&value);
        }
    }

    /// Register a change callback. It is not invoked with the current value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, Arc::new(callback)));
            id
        };
        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.lock().observers.retain(|(oid, _)| *oid != id);
                }
            })),
        }
    }

    /// Number of live subscriptions
    pub fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }
}

/// Keeps a callback registered until dropped
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unsubscribe now rather than at drop
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
