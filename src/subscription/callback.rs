// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::DeviceState;

/// Unique identifier for a subscription.
///
/// IDs are allocated in increasing order and never reused within a
/// registry's lifetime, so they double as the registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for state change callbacks.
type StateChangedCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;

/// Registry for managing state change callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability. The lock is never held
/// while a callback runs, so callbacks may subscribe or unsubscribe freely.
///
/// # Ordering
///
/// Callbacks are invoked in registration order. A callback removed while a
/// dispatch is in progress is not invoked afterwards by that dispatch.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// State change callbacks keyed by registration order.
    state_changed_callbacks: RwLock<BTreeMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_changed_callbacks: RwLock::new(BTreeMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for state changes.
    ///
    /// The callback receives every new snapshot.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Dispatches a snapshot to every registered callback.
    ///
    /// Callbacks run synchronously on the caller's task, in registration
    /// order.
    pub fn dispatch(&self, state: &DeviceState) {
        let callbacks: Vec<(SubscriptionId, StateChangedCallback)> = self
            .state_changed_callbacks
            .read()
            .iter()
            .map(|(id, cb)| (*id, Arc::clone(cb)))
            .collect();

        for (id, callback) in callbacks {
            // skip handlers removed by an earlier handler in this dispatch
            if !self.state_changed_callbacks.read().contains_key(&id) {
                continue;
            }
            callback(state);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_state_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_state_changed(move |_state| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(registry.callback_count(), 1);

        registry.dispatch(&DeviceState::new());
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());

        registry.dispatch(&DeviceState::new());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_dispatch_in_registration_order() {
        let registry = CallbackRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let order = order.clone();
            registry.on_state_changed(move |_| order.lock().push(tag));
        }

        registry.dispatch(&DeviceState::new());
        assert_eq!(*order.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn registry_unsubscribe_during_dispatch() {
        let registry = Arc::new(CallbackRegistry::new());
        let calls = Arc::new(AtomicU32::new(0));

        let victim = Arc::new(Mutex::new(None::<SubscriptionId>));
        let registry_clone = Arc::clone(&registry);
        let victim_clone = Arc::clone(&victim);
        registry.on_state_changed(move |_| {
            if let Some(id) = *victim_clone.lock() {
                registry_clone.unsubscribe(id);
            }
        });

        let calls_clone = calls.clone();
        let id = registry.on_state_changed(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        *victim.lock() = Some(id);

        registry.dispatch(&DeviceState::new());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.callback_count(), 1);
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();
        let id1 = registry.on_state_changed(|_| {});
        let id2 = registry.on_state_changed(|_| {});
        assert!(id1 < id2);
    }

    #[test]
    fn registry_ids_not_reused_after_unsubscribe() {
        let registry = CallbackRegistry::new();
        let first = registry.on_state_changed(|_| {});
        assert!(registry.unsubscribe(first));

        let second = registry.on_state_changed(|_| {});
        assert!(first < second);
        assert!(!registry.unsubscribe(first));
        assert_eq!(registry.callback_count(), 1);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_state_changed(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}
