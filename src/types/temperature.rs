// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature for automatic airflow on Breez devices.

use std::fmt;

use crate::error::ValueError;

/// Target temperature in degrees Fahrenheit (32-120).
///
/// When automatic airflow is enabled, Breez devices turn the fan on above
/// this temperature and off below it.
///
/// # Examples
///
/// ```
/// use snooz_lib::types::TargetTemperature;
///
/// let target = TargetTemperature::new(72).unwrap();
/// assert_eq!(target.fahrenheit(), 72);
/// assert!(TargetTemperature::new(200).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct TargetTemperature(u8);

impl TargetTemperature {
    /// Lowest accepted target (freezing point).
    pub const MIN: u8 = 32;

    /// Highest accepted target.
    pub const MAX: u8 = 120;

    /// Creates a new target temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [32, 120].
    pub fn new(fahrenheit: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&fahrenheit) {
            return Err(ValueError::OutOfRange {
                min: u16::from(Self::MIN),
                max: u16::from(Self::MAX),
                actual: u16::from(fahrenheit),
            });
        }
        Ok(Self(fahrenheit))
    }

    /// Creates a target temperature, clamping to the valid range.
    #[must_use]
    pub const fn clamped(fahrenheit: u8) -> Self {
        if fahrenheit < Self::MIN {
            Self(Self::MIN)
        } else if fahrenheit > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(fahrenheit)
        }
    }

    /// Returns the temperature in degrees Fahrenheit.
    #[must_use]
    pub const fn fahrenheit(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°F", self.0)
    }
}

impl TryFrom<u8> for TargetTemperature {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetTemperature> for u8 {
    fn from(value: TargetTemperature) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert!(TargetTemperature::new(31).is_err());
        assert!(TargetTemperature::new(32).is_ok());
        assert!(TargetTemperature::new(120).is_ok());
        assert!(TargetTemperature::new(121).is_err());
    }

    #[test]
    fn clamped() {
        assert_eq!(TargetTemperature::clamped(0).fahrenheit(), 32);
        assert_eq!(TargetTemperature::clamped(68).fahrenheit(), 68);
        assert_eq!(TargetTemperature::clamped(250).fahrenheit(), 120);
    }

    #[test]
    fn display() {
        assert_eq!(TargetTemperature::new(72).unwrap().to_string(), "72°F");
    }
}
