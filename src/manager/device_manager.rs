// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of configured devices and the transition services.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use crate::command::{Command, CommandResult};
use crate::error::{Error, Result};
use crate::event::{DeviceEvent, EventBus};
use crate::transport::Transport;

use super::{ConfiguredDevice, TransitionOff, TransitionOn};

/// Owns every configured device of one host integration.
///
/// Devices are keyed by the host's device id. The manager is an ordinary
/// value: the host creates one and passes it to whatever handles service
/// calls.
pub struct DeviceManager<T: Transport> {
    devices: RwLock<HashMap<String, Arc<ConfiguredDevice<T>>>>,
    event_bus: EventBus,
}

impl<T: Transport> DeviceManager<T> {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::with_event_bus(EventBus::new())
    }

    /// Creates an empty manager publishing to `event_bus`.
    #[must_use]
    pub fn with_event_bus(event_bus: EventBus) -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
            event_bus,
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to device lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    // =========================================================================
    // Device Management
    // =========================================================================

    /// Registers a set-up device under `device_id`.
    ///
    /// A device already registered under the same id is unloaded and
    /// replaced.
    pub async fn add_device(
        &self,
        device_id: impl Into<String>,
        device: ConfiguredDevice<T>,
    ) -> Arc<ConfiguredDevice<T>> {
        let device_id = device_id.into();
        let address = device.session().address().clone();
        let device = Arc::new(device);

        let previous = self
            .devices
            .write()
            .await
            .insert(device_id.clone(), Arc::clone(&device));
        if let Some(previous) = previous {
            tracing::debug!(device_id = %device_id, "Replacing registered device");
            previous.unload().await;
        }

        self.event_bus
            .publish(DeviceEvent::device_added(device_id, address));
        device
    }

    /// Removes and unloads a device.
    ///
    /// Returns `true` if the device was registered.
    pub async fn remove_device(&self, device_id: &str) -> bool {
        let removed = self.devices.write().await.remove(device_id);
        let Some(device) = removed else {
            return false;
        };

        device.unload().await;
        self.event_bus
            .publish(DeviceEvent::device_removed(device_id));
        true
    }

    /// Reacts to a change of the entry title.
    ///
    /// Returns `true` and publishes [`DeviceEvent::ReloadRequested`] if the
    /// title differs from the one the device was set up with.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if no device is registered under
    /// `device_id`.
    pub async fn reload_title(&self, device_id: &str, title: &str) -> Result<bool> {
        let device = self.device(device_id).await?;
        if device.title() == title {
            return Ok(false);
        }

        tracing::debug!(device_id, from = device.title(), to = title, "Title changed");
        self.event_bus
            .publish(DeviceEvent::reload_requested(device_id, title));
        Ok(true)
    }

    /// Returns the device registered under `device_id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if there is none.
    pub async fn device(&self, device_id: &str) -> Result<Arc<ConfiguredDevice<T>>> {
        self.devices
            .read()
            .await
            .get(device_id)
            .cloned()
            .ok_or_else(|| Error::DeviceNotFound(device_id.to_string()))
    }

    /// Returns every registered device id.
    pub async fn device_ids(&self) -> Vec<String> {
        self.devices.read().await.keys().cloned().collect()
    }

    /// Returns the number of registered devices.
    pub async fn device_count(&self) -> usize {
        self.devices.read().await.len()
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Ramps the given devices on.
    ///
    /// Devices are commanded one after the other, in request order. Devices
    /// with nothing to do (a fan-only request on a model without a fan) are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` before anything is sent if any id is
    /// unknown. Command failures are logged and reported in the results.
    pub async fn transition_on(
        &self,
        request: &TransitionOn,
    ) -> Result<Vec<(String, CommandResult)>> {
        let targets = self.resolve(&request.device_ids).await?;
        Ok(Self::run_service(targets, |device| {
            request.command_for(device.info().supports_fan())
        })
        .await)
    }

    /// Ramps the given devices off.
    ///
    /// # Errors
    ///
    /// See [`transition_on`](Self::transition_on).
    pub async fn transition_off(
        &self,
        request: &TransitionOff,
    ) -> Result<Vec<(String, CommandResult)>> {
        let targets = self.resolve(&request.device_ids).await?;
        Ok(Self::run_service(targets, |device| {
            request.command_for(device.info().supports_fan())
        })
        .await)
    }

    async fn resolve(&self, device_ids: &[String]) -> Result<Vec<(String, Arc<ConfiguredDevice<T>>)>> {
        let devices = self.devices.read().await;
        device_ids
            .iter()
            .map(|id| {
                devices
                    .get(id)
                    .map(|device| (id.clone(), Arc::clone(device)))
                    .ok_or_else(|| Error::DeviceNotFound(id.clone()))
            })
            .collect()
    }

    async fn run_service<F>(
        targets: Vec<(String, Arc<ConfiguredDevice<T>>)>,
        command_for: F,
    ) -> Vec<(String, CommandResult)>
    where
        F: Fn(&ConfiguredDevice<T>) -> Command,
    {
        let mut results = Vec::with_capacity(targets.len());
        for (device_id, device) in targets {
            let command = command_for(&device);
            if command.is_empty() {
                tracing::debug!(device_id = %device_id, "Nothing to transition");
                continue;
            }

            let result = device.session().execute_command(command).await;
            if let Some(failure) = result.failure() {
                tracing::warn!(
                    device_id = %device_id,
                    address = %device.session().address(),
                    %command,
                    %failure,
                    "Transition failed"
                );
            }
            results.push((device_id, result));
        }
        results
    }
}

impl<T: Transport> Default for DeviceManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> std::fmt::Debug for DeviceManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceManager")
            .field("event_bus", &self.event_bus)
            .finish_non_exhaustive()
    }
}
