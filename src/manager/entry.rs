// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-persisted configuration entries.

use serde::{Deserialize, Serialize};

use crate::advertisement::DeviceAdvertisementData;
use crate::error::{Error, Result};
use crate::types::{DeviceAddress, DeviceModel, FirmwareVersion, PairingToken};

/// Configuration record a host stores for one paired device.
///
/// Version 1 entries only carried the address and token. Version 2 adds the
/// model and firmware generation read from an advertisement, which the
/// session needs to pick the right protocol.
///
/// # Examples
///
/// ```
/// use snooz_lib::manager::EntryData;
/// use snooz_lib::testing::{TEST_TOKEN, advertisement};
/// use snooz_lib::types::{DeviceAddress, DeviceModel};
///
/// let address = DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap();
/// let mut entry = EntryData::legacy(address, TEST_TOKEN);
/// assert!(entry.needs_migration());
///
/// entry.migrate(Some(&advertisement(DeviceModel::Breez))).unwrap();
/// assert_eq!(entry.version, EntryData::CURRENT_VERSION);
/// assert_eq!(entry.model, Some(DeviceModel::Breez));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    /// BLE address of the device.
    pub address: DeviceAddress,
    /// Pairing token captured while the device was in pairing mode.
    pub token: PairingToken,
    /// Device model, absent in version 1 entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<DeviceModel>,
    /// Firmware generation, absent in version 1 entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<FirmwareVersion>,
    /// Entry schema version.
    #[serde(default = "legacy_version")]
    pub version: u32,
}

const fn legacy_version() -> u32 {
    1
}

impl EntryData {
    /// Schema version written by this crate.
    pub const CURRENT_VERSION: u32 = 2;

    /// Creates a current entry from a pairing advertisement.
    #[must_use]
    pub fn new(address: DeviceAddress, advertisement: &DeviceAdvertisementData) -> Self {
        Self {
            address,
            token: advertisement.token(),
            model: Some(advertisement.model()),
            firmware_version: Some(advertisement.firmware_version()),
            version: Self::CURRENT_VERSION,
        }
    }

    /// Creates a version 1 entry holding only the address and token.
    #[must_use]
    pub fn legacy(address: DeviceAddress, token: PairingToken) -> Self {
        Self {
            address,
            token,
            model: None,
            firmware_version: None,
            version: legacy_version(),
        }
    }

    /// Returns `true` if [`migrate`](Self::migrate) has work to do.
    #[must_use]
    pub fn needs_migration(&self) -> bool {
        self.version < Self::CURRENT_VERSION
    }

    /// Upgrades the entry to the current version.
    ///
    /// `advertisement` is the latest one the host saw for this address. The
    /// stored token is kept. Returns `true` if the entry changed and should be
    /// persisted again.
    ///
    /// # Errors
    ///
    /// Returns `Error::Migration` if the entry is outdated and no
    /// advertisement is available.
    pub fn migrate(&mut self, advertisement: Option<&DeviceAdvertisementData>) -> Result<bool> {
        if !self.needs_migration() {
            return Ok(false);
        }
        let Some(advertisement) = advertisement else {
            return Err(Error::Migration(format!(
                "no advertisement seen for {}; cannot determine model",
                self.address
            )));
        };

        let from = self.version;
        self.model = Some(advertisement.model());
        self.firmware_version = Some(advertisement.firmware_version());
        self.version = Self::CURRENT_VERSION;
        tracing::info!(
            address = %self.address,
            from,
            to = self.version,
            model = %advertisement.model(),
            "Migrated configuration entry"
        );
        Ok(true)
    }

    /// Rebuilds the advertisement the session is created from.
    ///
    /// # Errors
    ///
    /// Returns `Error::Migration` if the entry still lacks the model or
    /// firmware version.
    pub fn advertisement(&self) -> Result<DeviceAdvertisementData> {
        match (self.model, self.firmware_version) {
            (Some(model), Some(firmware)) => {
                Ok(DeviceAdvertisementData::new(model, firmware, self.token))
            }
            _ => Err(Error::Migration(format!(
                "entry for {} has not been migrated to version {}",
                self.address,
                Self::CURRENT_VERSION
            ))),
        }
    }
}
