// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Weak;

use crate::subscription::{CallbackRegistry, SubscriptionId};

/// Handle returned when subscribing to state changes.
///
/// Dropping the handle does not unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe) explicitly. The handle holds only a weak
/// reference to the registry, so it never keeps a session alive.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<CallbackRegistry>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: Weak<CallbackRegistry>) -> Self {
        Self { id, registry }
    }

    /// Returns the subscription ID.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Stops delivery to this subscription's handler.
    ///
    /// Idempotent. Returns `true` only on the call that removed the handler.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.unsubscribe(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn unsubscribe_is_idempotent() {
        let registry = Arc::new(CallbackRegistry::new());
        let id = registry.on_state_changed(|_| {});
        let sub = Subscription::new(id, Arc::downgrade(&registry));

        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert!(registry.is_empty());
    }

    #[test]
    fn unsubscribe_after_registry_dropped() {
        let registry = Arc::new(CallbackRegistry::new());
        let id = registry.on_state_changed(|_| {});
        let sub = Subscription::new(id, Arc::downgrade(&registry));
        drop(registry);

        assert!(!sub.unsubscribe());
    }
}
