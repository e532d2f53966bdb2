// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bluetooth device address type.

use std::fmt;

use crate::error::ValueError;

/// Hardware identifier of a BLE device.
///
/// On most platforms this is a MAC address (`00:00:00:00:AB:CD`); on macOS it
/// is a platform-assigned UUID. The value is opaque to this library, but it is
/// normalized to upper case so that the same device always compares equal.
///
/// # Examples
///
/// ```
/// use snooz_lib::types::DeviceAddress;
///
/// let address = DeviceAddress::new("00:00:00:00:ab:cd").unwrap();
/// assert_eq!(address.as_str(), "00:00:00:00:AB:CD");
/// assert!(DeviceAddress::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Creates a new device address.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptyAddress` if the address is blank.
    pub fn new(address: impl AsRef<str>) -> Result<Self, ValueError> {
        let trimmed = address.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueError::EmptyAddress);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DeviceAddress {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceAddress> for String {
    fn from(value: DeviceAddress) -> Self {
        value.0
    }
}
