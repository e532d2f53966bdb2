// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A device whose entry has been set up into a live session.

use std::sync::Arc;

use serde::Serialize;

use crate::entity::{Feature, FeatureEntity};
use crate::error::{Error, Result};
use crate::session::{DeviceSession, SessionConfig};
use crate::state::DeviceInfo;
use crate::transport::Transport;

use super::EntryData;

/// Integration domain used in registry identifiers.
pub const DOMAIN: &str = "snooz";

/// Connection type used in registry connections.
pub const CONNECTION_BLUETOOTH: &str = "bluetooth";

/// Device metadata a host shows in its device registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryInfo {
    /// Entry title.
    pub name: String,
    /// Manufacturer string reported by the device.
    pub manufacturer: String,
    /// Model display name.
    pub model: String,
    /// Hardware revision.
    pub hw_version: String,
    /// Software revision, or the firmware revision when absent.
    pub sw_version: Option<String>,
    /// `(domain, id)` pairs identifying the device.
    pub identifiers: Vec<(String, String)>,
    /// `(type, id)` pairs describing how the device is reached.
    pub connections: Vec<(String, String)>,
}

/// A set-up device: its session, metadata and entry title.
pub struct ConfiguredDevice<T: Transport> {
    session: Arc<DeviceSession<T>>,
    info: DeviceInfo,
    title: String,
}

impl<T: Transport> ConfiguredDevice<T> {
    /// Sets up a device from its stored entry.
    ///
    /// Builds the session and reads the Device Information service. The
    /// entry must already be migrated.
    ///
    /// # Errors
    ///
    /// Returns `Error::Setup` if the transport is for another address or the
    /// device information cannot be read, and `Error::Migration` if the
    /// entry is outdated. After a failed read the session is disconnected.
    pub async fn setup(
        transport: T,
        entry: &EntryData,
        title: impl Into<String>,
        config: SessionConfig,
    ) -> Result<Self> {
        if transport.address() != &entry.address {
            return Err(Error::Setup(format!(
                "transport is bound to {}, entry is for {}",
                transport.address(),
                entry.address
            )));
        }
        let advertisement = entry.advertisement()?;
        let session = Arc::new(DeviceSession::new(transport, advertisement, config));

        let Some(info) = session.get_info().await else {
            session.disconnect().await;
            return Err(Error::Setup(format!(
                "failed to read device information from {}",
                entry.address
            )));
        };

        let title = title.into();
        tracing::info!(
            address = %entry.address,
            model = %info.model(),
            title = %title,
            "Device set up"
        );
        Ok(Self {
            session,
            info,
            title,
        })
    }

    /// Returns the session.
    #[must_use]
    pub fn session(&self) -> &Arc<DeviceSession<T>> {
        &self.session
    }

    /// Returns the metadata read during setup.
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Returns the entry title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Builds the registry record for this device.
    #[must_use]
    pub fn registry_info(&self) -> RegistryInfo {
        let address = self.session.address().to_string();
        RegistryInfo {
            name: self.title.clone(),
            manufacturer: self.info.manufacturer().to_string(),
            model: self.info.model().display_name().to_string(),
            hw_version: self.info.hardware().to_string(),
            sw_version: self.info.display_version().map(str::to_string),
            identifiers: vec![(DOMAIN.to_string(), address.clone())],
            connections: vec![(CONNECTION_BLUETOOTH.to_string(), address)],
        }
    }

    /// Returns the features this device exposes.
    #[must_use]
    pub fn features(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|feature| match feature {
                Feature::Sound | Feature::Light | Feature::NightMode => true,
                Feature::Airflow => self.session.advertisement().supports_fan(),
                Feature::Climate => self.info.supports_fan(),
            })
            .collect()
    }

    /// Creates one entity per supported feature.
    #[must_use]
    pub fn entities(&self) -> Vec<FeatureEntity<T>> {
        self.features()
            .into_iter()
            .map(|feature| FeatureEntity::new(Arc::clone(&self.session), feature))
            .collect()
    }

    /// Closes the session.
    pub async fn unload(&self) {
        self.session.disconnect().await;
    }
}

impl<T: Transport> std::fmt::Debug for ConfiguredDevice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredDevice")
            .field("title", &self.title)
            .field("session", &self.session)
            .field("info", &self.info)
            .finish()
    }
}
