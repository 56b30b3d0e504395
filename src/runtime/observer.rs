//! Adapter change notification.
//!
//! Invariants:
//! - An observer is registered at most once (pointer identity).
//! - `notify_changed` calls observers synchronously, last-registered first, and returns only
//!   after every observer ran or one of them failed.
//! - The observer list is guarded by a mutex so registration never races a notification
//!   snapshot. The guard is not held while observers run.

use std::fmt;
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::runtime::adapter::Adapter;

/// Receives "data set changed" notifications from an adapter.
pub trait AdapterDataObserver {
    fn on_changed(&self) -> Result<()>;
}

pub type ObserverRc = Rc<dyn AdapterDataObserver>;

fn same_observer(a: &ObserverRc, b: &ObserverRc) -> bool {
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

#[derive(Default)]
pub struct AdapterDataObservable {
    observers: Mutex<Vec<ObserverRc>>,
}

impl AdapterDataObservable {
    pub fn new() -> Self {
        Self::default()
    }

    fn observers(&self) -> MutexGuard<'_, Vec<ObserverRc>> {
        match self.observers.lock() {
            Ok(observers) => observers,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn has_observers(&self) -> bool {
        !self.observers().is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.observers().len()
    }

    /// Adds `observer` unless it is already registered. Returns whether it was added.
    pub fn register_observer(&self, observer: ObserverRc) -> bool {
        let mut observers = self.observers();
        if observers.iter().any(|existing| same_observer(existing, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Removes `observer`. Returns whether it was registered.
    pub fn unregister_observer(&self, observer: &ObserverRc) -> bool {
        let mut observers = self.observers();
        let before = observers.len();
        observers.retain(|existing| !same_observer(existing, observer));
        observers.len() != before
    }

    pub fn unregister_all(&self) {
        self.observers().clear();
    }

    pub fn notify_changed(&self) -> Result<()> {
        let snapshot: Vec<ObserverRc> = self.observers().iter().rev().cloned().collect();
        for observer in snapshot {
            observer.on_changed()?;
        }
        Ok(())
    }
}

impl fmt::Debug for AdapterDataObservable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterDataObservable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Keeps an observer registered on an adapter until dropped.
pub struct AdapterSubscription {
    adapter: Rc<dyn Adapter>,
    observer: ObserverRc,
}

impl AdapterSubscription {
    pub fn new(adapter: Rc<dyn Adapter>, observer: ObserverRc) -> Self {
        adapter.register_adapter_data_observer(Rc::clone(&observer));
        Self { adapter, observer }
    }

    pub fn adapter(&self) -> &Rc<dyn Adapter> {
        &self.adapter
    }
}

impl Drop for AdapterSubscription {
    fn drop(&mut self) {
        self.adapter.unregister_adapter_data_observer(&self.observer);
    }
}

impl fmt::Debug for AdapterSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterSubscription").finish_non_exhaustive()
    }
}
