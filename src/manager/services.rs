// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition service requests.
//!
//! Both requests deserialize from the service-call data a host receives, so
//! out-of-range levels or durations are rejected while parsing.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::types::{Percentage, TransitionDuration};

/// Ramps devices on.
///
/// With neither level given, sound turns on at its current volume (and the
/// fan at its current speed on fan-capable models). Otherwise only the given
/// levels are ramped to.
///
/// # Examples
///
/// ```
/// use snooz_lib::manager::TransitionOn;
///
/// let request: TransitionOn =
///     serde_json::from_str(r#"{"device_ids": ["nursery"], "volume": 60}"#).unwrap();
/// assert_eq!(request.duration.seconds(), 20);
///
/// let command = request.command_for(true);
/// assert_eq!(command.on(), Some(true));
/// assert!(command.fan_on().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOn {
    /// Host ids of the devices to ramp.
    pub device_ids: Vec<String>,
    /// Target white noise volume.
    #[serde(default)]
    pub volume: Option<Percentage>,
    /// Target fan speed.
    #[serde(default)]
    pub fan_speed: Option<Percentage>,
    /// Ramp duration.
    #[serde(default)]
    pub duration: TransitionDuration,
}

impl TransitionOn {
    /// Creates a request with no levels and the default duration.
    #[must_use]
    pub fn new<I, S>(device_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            device_ids: device_ids.into_iter().map(Into::into).collect(),
            volume: None,
            fan_speed: None,
            duration: TransitionDuration::default(),
        }
    }

    /// Sets the target volume.
    #[must_use]
    pub fn with_volume(mut self, volume: Percentage) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Sets the target fan speed.
    #[must_use]
    pub fn with_fan_speed(mut self, fan_speed: Percentage) -> Self {
        self.fan_speed = Some(fan_speed);
        self
    }

    /// Sets the ramp duration.
    #[must_use]
    pub fn with_duration(mut self, duration: TransitionDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Builds the command for one device.
    ///
    /// Fan fields are only set when `supports_fan` is true.
    #[must_use]
    pub fn command_for(&self, supports_fan: bool) -> Command {
        let mut command = Command::new().with_duration(self.duration);
        if self.volume.is_none() && self.fan_speed.is_none() {
            command = command.with_on(true);
            if supports_fan {
                command = command.with_fan_on(true);
            }
            return command;
        }

        if let Some(volume) = self.volume {
            command = command.with_on(true).with_volume(volume);
        }
        if let Some(speed) = self.fan_speed.filter(|_| supports_fan) {
            command = command.with_fan_on(true).with_fan_speed(speed);
        }
        command
    }
}

/// Ramps devices off.
///
/// With neither flag set, both sound and fan turn off. Otherwise only the
/// flagged features do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOff {
    /// Host ids of the devices to ramp.
    pub device_ids: Vec<String>,
    /// Turn white noise off.
    #[serde(default)]
    pub volume: bool,
    /// Turn the fan off.
    #[serde(default)]
    pub fan_speed: bool,
    /// Ramp duration.
    #[serde(default)]
    pub duration: TransitionDuration,
}

impl TransitionOff {
    /// Creates a request that turns everything off with the default duration.
    #[must_use]
    pub fn new<I, S>(device_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            device_ids: device_ids.into_iter().map(Into::into).collect(),
            volume: false,
            fan_speed: false,
            duration: TransitionDuration::default(),
        }
    }

    /// Limits the request to white noise (combinable with
    /// [`only_fan`](Self::only_fan)).
    #[must_use]
    pub fn only_volume(mut self) -> Self {
        self.volume = true;
        self
    }

    /// Limits the request to the fan.
    #[must_use]
    pub fn only_fan(mut self) -> Self {
        self.fan_speed = true;
        self
    }

    /// Sets the ramp duration.
    #[must_use]
    pub fn with_duration(mut self, duration: TransitionDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Builds the command for one device.
    #[must_use]
    pub fn command_for(&self, supports_fan: bool) -> Command {
        let everything = !self.volume && !self.fan_speed;
        let mut command = Command::new().with_duration(self.duration);
        if everything || self.volume {
            command = command.with_on(false);
        }
        if supports_fan && (everything || self.fan_speed) {
            command = command.with_fan_on(false);
        }
        command
    }
}
