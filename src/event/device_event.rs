// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device lifecycle event types.

use crate::types::DeviceAddress;

/// Events emitted by the device manager.
///
/// Every event carries the host's device id, the key the device was
/// registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A configured device was registered.
    DeviceAdded {
        /// Host device id.
        device_id: String,
        /// BLE address of the device.
        address: DeviceAddress,
    },

    /// A device was removed and its session closed.
    DeviceRemoved {
        /// Host device id.
        device_id: String,
    },

    /// The device's entry changed in a way that needs the host to set it up
    /// again.
    ReloadRequested {
        /// Host device id.
        device_id: String,
        /// The new entry title.
        title: String,
    },
}

impl DeviceEvent {
    /// Returns the host device id this event refers to.
    #[must_use]
    pub fn device_id(&self) -> &str {
        match self {
            Self::DeviceAdded { device_id, .. }
            | Self::DeviceRemoved { device_id }
            | Self::ReloadRequested { device_id, .. } => device_id,
        }
    }

    /// Returns `true` for added and removed events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(device_id: impl Into<String>, address: DeviceAddress) -> Self {
        Self::DeviceAdded {
            device_id: device_id.into(),
            address,
        }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(device_id: impl Into<String>) -> Self {
        Self::DeviceRemoved {
            device_id: device_id.into(),
        }
    }

    /// Creates a reload request.
    #[must_use]
    pub fn reload_requested(device_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::ReloadRequested {
            device_id: device_id.into(),
            title: title.into(),
        }
    }
}
