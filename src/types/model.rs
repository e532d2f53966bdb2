// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device model, firmware generation and pairing token.

use std::fmt;

use crate::error::ValueError;

/// Hardware model of a SNOOZ device.
///
/// The numeric codes are the ones persisted in configuration entries.
///
/// # Examples
///
/// ```
/// use snooz_lib::types::DeviceModel;
///
/// assert!(DeviceModel::Breez.supports_fan());
/// assert!(!DeviceModel::Original.supports_fan());
/// assert_eq!(DeviceModel::Pro.display_name(), "SNOOZ Pro");
/// assert_eq!(DeviceModel::try_from(2).unwrap(), DeviceModel::Breez);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeviceModel {
    /// The original SNOOZ white noise machine.
    Original,
    /// SNOOZ Pro.
    Pro,
    /// Breez: white noise plus a fan with temperature sensing.
    Breez,
}

impl DeviceModel {
    /// Returns the numeric code of this model.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Original => 0,
            Self::Pro => 1,
            Self::Breez => 2,
        }
    }

    /// Returns `true` if this model has an airflow fan.
    #[must_use]
    pub const fn supports_fan(self) -> bool {
        matches!(self, Self::Breez)
    }

    /// Returns the marketing name of this model.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Original => "SNOOZ Original",
            Self::Pro => "SNOOZ Pro",
            Self::Breez => "Breez",
        }
    }

    /// Infers the model from an advertised local name.
    ///
    /// Returns `None` if the name does not belong to a SNOOZ device.
    #[must_use]
    pub fn from_local_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.starts_with("breez") {
            Some(Self::Breez)
        } else if lower.starts_with("snooz pro") || lower.starts_with("snooz-pro") {
            Some(Self::Pro)
        } else if lower.starts_with("snooz") {
            Some(Self::Original)
        } else {
            None
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<u8> for DeviceModel {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Original),
            1 => Ok(Self::Pro),
            2 => Ok(Self::Breez),
            other => Err(ValueError::UnknownModel(other)),
        }
    }
}

impl From<DeviceModel> for u8 {
    fn from(value: DeviceModel) -> Self {
        value.code()
    }
}

/// Protocol generation of the device firmware.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum FirmwareVersion {
    /// Generation 2.
    V2,
    /// Generation 3.
    V3,
    /// Generation 4.
    V4,
    /// Generation 5.
    V5,
    /// Generation 6.
    V6,
}

impl FirmwareVersion {
    /// Returns the numeric code of this version.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
            Self::V5 => 5,
            Self::V6 => 6,
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.code())
    }
}

impl TryFrom<u8> for FirmwareVersion {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            4 => Ok(Self::V4),
            5 => Ok(Self::V5),
            6 => Ok(Self::V6),
            other => Err(ValueError::UnknownFirmwareVersion(other)),
        }
    }
}

impl From<FirmwareVersion> for u8 {
    fn from(value: FirmwareVersion) -> Self {
        value.code()
    }
}

/// Pairing token that authorizes writes to a device (8 bytes).
///
/// Serialized as 16 lowercase hexadecimal characters.
///
/// # Examples
///
/// ```
/// use snooz_lib::types::PairingToken;
///
/// let token: PairingToken = "deadbeefdeadbeef".parse().unwrap();
/// assert_eq!(token.to_string(), "deadbeefdeadbeef");
/// assert!("xyz".parse::<PairingToken>().is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PairingToken([u8; 8]);

impl PairingToken {
    /// Length of a token in bytes.
    pub const LEN: usize = 8;

    /// Creates a token from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Creates a token from a slice, which must be exactly 8 bytes long.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidToken` for any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValueError> {
        let array: [u8; 8] = bytes
            .try_into()
            .map_err(|_| ValueError::InvalidToken(hex::encode(bytes)))?;
        Ok(Self(array))
    }

    /// Returns the raw token bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Returns `true` if every byte is zero (no token advertised).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl std::str::FromStr for PairingToken {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim()).map_err(|_| ValueError::InvalidToken(s.to_string()))?;
        Self::from_slice(&bytes).map_err(|_| ValueError::InvalidToken(s.to_string()))
    }
}

impl fmt::Display for PairingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for PairingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PairingToken(..)")
    }
}

impl TryFrom<String> for PairingToken {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PairingToken> for String {
    fn from(value: PairingToken) -> Self {
        value.to_string()
    }
}
