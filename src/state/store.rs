//! Observable store with a pure reducer.
//!
//! DESIGN
//! ======
//! A `Store<S>` owns one state value behind a mutex. Every mutation goes
//! through [`Store::dispatch`], which runs the state's reducer under the
//! lock and then notifies subscribers with a snapshot after the lock is
//! released, so a listener may dispatch into any store (including this
//! one) without deadlocking.
//!
//! Reducers report whether an action changed anything; listeners are only
//! notified for applied actions. Stale completions rejected by a reducer
//! are therefore invisible to subscribers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

/// State that can be advanced by actions.
pub trait Reduce {
    type Action;

    /// Apply `action`. Returns `false` when the action was ignored.
    fn reduce(&mut self, action: Self::Action) -> bool;
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Inner<S> {
    state: S,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

pub struct Store<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: Reduce + Clone> Store<S> {
    #[must_use]
    pub fn new(state: S) -> Self {
        Self { inner: Arc::new(Mutex::new(Inner { state, listeners: Vec::new(), next_id: 0 })) }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> S {
        self.lock().state.clone()
    }

    /// Read part of the state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock().state)
    }

    /// Run the reducer and notify subscribers. Returns the resulting state.
    pub fn dispatch(&self, action: S::Action) -> S {
        let (snapshot, listeners) = {
            let mut inner = self.lock();
            let applied = inner.state.reduce(action);
            let listeners: Vec<Listener<S>> = if applied {
                inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
            } else {
                Vec::new()
            };
            (inner.state.clone(), listeners)
        };
        for listener in listeners {
            listener(&snapshot);
        }
        snapshot
    }

    /// Register a listener called after every applied action.
    pub fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() != before
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }
}
