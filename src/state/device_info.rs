// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static device metadata.

use crate::error::ParseError;
use crate::types::DeviceModel;

/// Descriptive metadata read once when a session starts.
///
/// Built from the strings of the BLE Device Information service. Immutable
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceInfo {
    manufacturer: String,
    model: DeviceModel,
    hardware: String,
    software: Option<String>,
    firmware: Option<String>,
    supports_fan: bool,
}

impl DeviceInfo {
    /// Parses metadata from raw characteristic values.
    ///
    /// `manufacturer` and `hardware` are required; `software` and `firmware`
    /// are optional because older firmware does not expose them. Trailing NUL
    /// padding and surrounding whitespace are stripped.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidUtf8` if a value is not UTF-8, or
    /// `ParseError::MissingField` if a required value is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use snooz_lib::state::DeviceInfo;
    /// use snooz_lib::types::DeviceModel;
    ///
    /// let info = DeviceInfo::parse(DeviceModel::Breez, b"SNOOZ, LLC\0", b"1.0", None, Some(b"2.3.1".as_slice()))
    ///     .unwrap();
    /// assert_eq!(info.manufacturer(), "SNOOZ, LLC");
    /// assert_eq!(info.display_version(), Some("2.3.1"));
    /// assert!(info.supports_fan());
    /// ```
    pub fn parse(
        model: DeviceModel,
        manufacturer: &[u8],
        hardware: &[u8],
        software: Option<&[u8]>,
        firmware: Option<&[u8]>,
    ) -> Result<Self, ParseError> {
        let manufacturer = required_string("manufacturer", manufacturer)?;
        let hardware = required_string("hardware", hardware)?;
        let software = software
            .map(|raw| decode_string("software", raw))
            .transpose()?
            .filter(|s| !s.is_empty());
        let firmware = firmware
            .map(|raw| decode_string("firmware", raw))
            .transpose()?
            .filter(|s| !s.is_empty());

        Ok(Self {
            manufacturer,
            model,
            hardware,
            software,
            firmware,
            supports_fan: model.supports_fan(),
        })
    }

    /// Returns the manufacturer name.
    #[must_use]
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Returns the device model.
    #[must_use]
    pub fn model(&self) -> DeviceModel {
        self.model
    }

    /// Returns the hardware revision.
    #[must_use]
    pub fn hardware(&self) -> &str {
        &self.hardware
    }

    /// Returns the software revision, if reported.
    #[must_use]
    pub fn software(&self) -> Option<&str> {
        self.software.as_deref()
    }

    /// Returns the firmware revision, if reported.
    #[must_use]
    pub fn firmware(&self) -> Option<&str> {
        self.firmware.as_deref()
    }

    /// Returns the version to show to users: software, else firmware.
    #[must_use]
    pub fn display_version(&self) -> Option<&str> {
        self.software().or(self.firmware())
    }

    /// Returns `true` if the device has an airflow fan.
    #[must_use]
    pub fn supports_fan(&self) -> bool {
        self.supports_fan
    }
}

fn decode_string(field: &str, raw: &[u8]) -> Result<String, ParseError> {
    let text = std::str::from_utf8(raw).map_err(|_| ParseError::InvalidUtf8(field.to_string()))?;
    Ok(text.trim_end_matches('\0').trim().to_string())
}

fn required_string(field: &str, raw: &[u8]) -> Result<String, ParseError> {
    let value = decode_string(field, raw)?;
    if value.is_empty() {
        return Err(ParseError::MissingField(field.to_string()));
    }
    Ok(value)
}
