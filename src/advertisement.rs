// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Advertisement data broadcast by SNOOZ devices.
//!
//! Scanning is left to the host; this module only turns the pieces of a
//! discovered advertisement (local name and manufacturer data) into a
//! [`DeviceAdvertisementData`].
//!
//! # Payload
//!
//! Manufacturer data is published under company id `0xFFFF`:
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0 | Flags | bit 0: pairing mode, bits 1-7: firmware version |
//! | 1-8 | Pairing token | 8 bytes, all zero when not pairing |

use std::collections::HashMap;

use crate::types::{DeviceModel, FirmwareVersion, PairingToken};

/// Company id SNOOZ devices publish their manufacturer data under.
pub const MANUFACTURER_ID: u16 = 0xFFFF;

const PAYLOAD_LEN: usize = 1 + PairingToken::LEN;
const PAIRING_FLAG: u8 = 0x01;

/// Model, firmware and pairing token of a device.
///
/// Immutable once created; used to decide which features a device exposes.
///
/// # Examples
///
/// ```
/// use snooz_lib::advertisement::DeviceAdvertisementData;
/// use snooz_lib::types::{DeviceModel, FirmwareVersion};
///
/// let adv = DeviceAdvertisementData::new(
///     DeviceModel::Breez,
///     FirmwareVersion::V6,
///     "deadbeefdeadbeef".parse().unwrap(),
/// );
/// assert!(adv.supports_fan());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAdvertisementData {
    model: DeviceModel,
    firmware_version: FirmwareVersion,
    token: PairingToken,
}

impl DeviceAdvertisementData {
    /// Creates advertisement data from known values.
    #[must_use]
    pub const fn new(
        model: DeviceModel,
        firmware_version: FirmwareVersion,
        token: PairingToken,
    ) -> Self {
        Self {
            model,
            firmware_version,
            token,
        }
    }

    /// Returns the device model.
    #[must_use]
    pub const fn model(&self) -> DeviceModel {
        self.model
    }

    /// Returns the firmware protocol generation.
    #[must_use]
    pub const fn firmware_version(&self) -> FirmwareVersion {
        self.firmware_version
    }

    /// Returns the pairing token.
    #[must_use]
    pub const fn token(&self) -> PairingToken {
        self.token
    }

    /// Returns `true` if the advertisement carried a pairing token.
    #[must_use]
    pub fn is_pairing(&self) -> bool {
        !self.token.is_empty()
    }

    /// Returns `true` if the device has an airflow fan.
    #[must_use]
    pub const fn supports_fan(&self) -> bool {
        self.model.supports_fan()
    }
}

/// Parses a SNOOZ advertisement.
///
/// Returns `None` when the local name or manufacturer data do not belong to a
/// supported SNOOZ device.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use snooz_lib::advertisement::{MANUFACTURER_ID, parse_advertisement};
///
/// let mut data = HashMap::new();
/// let mut payload = vec![0x05];
/// payload.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef, 0xde, 0xad, 0xbe, 0xef]);
/// data.insert(MANUFACTURER_ID, payload);
///
/// let adv = parse_advertisement("Snooz-ABCD", &data).unwrap();
/// assert!(adv.is_pairing());
/// assert_eq!(adv.token().to_string(), "deadbeefdeadbeef");
/// ```
#[must_use]
pub fn parse_advertisement(
    local_name: &str,
    manufacturer_data: &HashMap<u16, Vec<u8>>,
) -> Option<DeviceAdvertisementData> {
    let model = DeviceModel::from_local_name(local_name)?;
    let payload = manufacturer_data.get(&MANUFACTURER_ID)?;

    if payload.len() != PAYLOAD_LEN {
        tracing::trace!(
            name = local_name,
            len = payload.len(),
            "Ignoring manufacturer data with unexpected length"
        );
        return None;
    }

    let flags = payload[0];
    let firmware_version = FirmwareVersion::try_from(flags >> 1).ok()?;
    let token = PairingToken::from_slice(&payload[1..]).ok()?;
    let pairing = flags & PAIRING_FLAG != 0;

    // A device outside pairing mode must not leak its token.
    if !pairing && !token.is_empty() {
        return None;
    }

    Some(DeviceAdvertisementData::new(model, firmware_version, token))
}
