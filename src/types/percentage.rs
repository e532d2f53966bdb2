// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Percentage type for volume, fan speed and light brightness.
//!
//! SNOOZ devices express every level they control as an integer percentage.
//! This type guarantees values are always within 0-100.

use std::fmt;

use crate::error::ValueError;

/// A level as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use snooz_lib::types::Percentage;
///
/// let volume = Percentage::new(75).unwrap();
/// assert_eq!(volume.value(), 75);
///
/// assert_eq!(Percentage::MIN.value(), 0);
/// assert_eq!(Percentage::MAX.value(), 100);
///
/// assert!(Percentage::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Minimum value (0%).
    pub const MIN: Self = Self(0);

    /// Maximum value (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a percentage, clamping to the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use snooz_lib::types::Percentage;
    ///
    /// assert_eq!(Percentage::clamped(150).value(), 100);
    /// ```
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` for 0%.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Linearly interpolates between `self` and `target`.
    ///
    /// `step` out of `steps` selects the point on the line; `step == steps`
    /// always yields `target` exactly.
    #[must_use]
    pub fn interpolate(self, target: Self, step: u32, steps: u32) -> Self {
        if steps == 0 || step >= steps {
            return target;
        }
        let from = i64::from(self.0);
        let to = i64::from(target.0);
        let value = from + (to - from) * i64::from(step) / i64::from(steps);
        // Safe: value lies between two values that are both within 0-100
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(value as u8)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(value: Percentage) -> Self {
        value.0
    }
}
