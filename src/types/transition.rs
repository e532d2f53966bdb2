// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition duration for gradual volume and fan speed changes.

use std::fmt;
use std::time::Duration;

use crate::error::ValueError;

/// Transition duration in seconds (1-300).
///
/// A command carrying a transition duration ramps volume and fan speed
/// towards their targets instead of jumping to them.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use snooz_lib::types::TransitionDuration;
///
/// let duration = TransitionDuration::new(20).unwrap();
/// assert_eq!(duration.as_duration(), Duration::from_secs(20));
///
/// assert_eq!(TransitionDuration::default().seconds(), 20);
/// assert!(TransitionDuration::new(0).is_err());
/// assert!(TransitionDuration::new(301).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct TransitionDuration(u16);

impl TransitionDuration {
    /// Minimum duration (1 second).
    pub const MIN: u16 = 1;

    /// Maximum duration (5 minutes).
    pub const MAX: u16 = 300;

    /// Duration used by the transition services when none is given.
    pub const DEFAULT: Self = Self(20);

    /// Creates a new transition duration.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 300].
    pub fn new(seconds: u16) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&seconds) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: seconds,
            });
        }
        Ok(Self(seconds))
    }

    /// Returns the duration in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u16 {
        self.0
    }

    /// Returns the duration as a [`Duration`].
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl Default for TransitionDuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TransitionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<u16> for TransitionDuration {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TransitionDuration> for u16 {
    fn from(value: TransitionDuration) -> Self {
        value.0
    }
}
