// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SNOOZ command definitions.
//!
//! A [`Command`] is a partial state change: every field is optional and an
//! unset field means "leave unchanged". Commands are immutable value objects
//! built either with the free constructor functions in this module or with
//! the `with_*` builder methods.
//!
//! # Available Constructors
//!
//! | Constructor | Purpose |
//! |-------------|---------|
//! | [`turn_on`] / [`turn_off`] | White noise on/off, optionally ramped |
//! | [`set_volume`] | White noise volume |
//! | [`turn_fan_on`] / [`turn_fan_off`] | Airflow fan on/off, optionally ramped |
//! | [`set_fan_speed`] | Airflow fan speed |
//! | [`enable_auto_temp`] / [`disable_auto_temp`] | Temperature-driven airflow |
//! | [`set_temp_target`] | Auto-airflow threshold |
//! | [`turn_light_on`] / [`turn_light_off`] | Button light |
//! | [`enable_night_mode`] / [`disable_night_mode`] | Night mode |
//!
//! # Examples
//!
//! ```
//! use snooz_lib::command::{Command, turn_on};
//! use snooz_lib::types::{Percentage, TransitionDuration};
//!
//! let cmd = turn_on(
//!     Some(Percentage::new(75).unwrap()),
//!     Some(TransitionDuration::new(20).unwrap()),
//! );
//! assert_eq!(cmd.on(), Some(true));
//! assert_eq!(cmd.to_string(), "Command(on=true, volume=75%, duration=20s)");
//!
//! let custom = Command::new()
//!     .with_on(true)
//!     .with_fan_on(true)
//!     .with_fan_speed(Percentage::new(40).unwrap());
//! assert!(!custom.is_empty());
//! ```

mod result;

pub use result::{CommandFailure, CommandResult, CommandResultStatus};

use std::fmt;

use crate::types::{Percentage, TargetTemperature, TransitionDuration};

/// A request to change a subset of a device's state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Command {
    on: Option<bool>,
    volume: Option<Percentage>,
    fan_on: Option<bool>,
    fan_speed: Option<Percentage>,
    fan_auto_enabled: Option<bool>,
    target_temperature: Option<TargetTemperature>,
    light_on: Option<bool>,
    light_brightness: Option<Percentage>,
    night_mode_enabled: Option<bool>,
    duration: Option<TransitionDuration>,
}

macro_rules! command_field {
    ($field:ident, $with:ident, $ty:ty, $doc:literal) => {
        #[doc = concat!("Returns the requested ", $doc, ", if set.")]
        #[must_use]
        pub const fn $field(&self) -> Option<$ty> {
            self.$field
        }

        #[doc = concat!("Sets the requested ", $doc, ".")]
        #[must_use]
        pub const fn $with(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

impl Command {
    /// Creates an empty command that changes nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            on: None,
            volume: None,
            fan_on: None,
            fan_speed: None,
            fan_auto_enabled: None,
            target_temperature: None,
            light_on: None,
            light_brightness: None,
            night_mode_enabled: None,
            duration: None,
        }
    }

    command_field!(on, with_on, bool, "white noise power state");
    command_field!(volume, with_volume, Percentage, "white noise volume");
    command_field!(fan_on, with_fan_on, bool, "fan power state");
    command_field!(fan_speed, with_fan_speed, Percentage, "fan speed");
    command_field!(
        fan_auto_enabled,
        with_fan_auto_enabled,
        bool,
        "automatic airflow state"
    );
    command_field!(
        target_temperature,
        with_target_temperature,
        TargetTemperature,
        "auto-airflow target temperature"
    );
    command_field!(light_on, with_light_on, bool, "button light state");
    command_field!(
        light_brightness,
        with_light_brightness,
        Percentage,
        "button light brightness"
    );
    command_field!(
        night_mode_enabled,
        with_night_mode_enabled,
        bool,
        "night mode state"
    );
    command_field!(duration, with_duration, TransitionDuration, "transition duration");

    /// Sets the transition duration if one is given.
    #[must_use]
    pub const fn with_optional_duration(mut self, duration: Option<TransitionDuration>) -> Self {
        self.duration = duration;
        self
    }

    /// Returns `true` if no state field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.on.is_none()
            && self.volume.is_none()
            && self.fan_on.is_none()
            && self.fan_speed.is_none()
            && self.fan_auto_enabled.is_none()
            && self.target_temperature.is_none()
            && self.light_on.is_none()
            && self.light_brightness.is_none()
            && self.night_mode_enabled.is_none()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        macro_rules! push_if_some {
            ($field:ident) => {
                if let Some(v) = self.$field {
                    parts.push(format!(concat!(stringify!($field), "={}"), v));
                }
            };
        }

        push_if_some!(on);
        push_if_some!(volume);
        push_if_some!(fan_on);
        push_if_some!(fan_speed);
        push_if_some!(fan_auto_enabled);
        push_if_some!(target_temperature);
        push_if_some!(light_on);
        push_if_some!(light_brightness);
        push_if_some!(night_mode_enabled);
        push_if_some!(duration);

        write!(f, "Command({})", parts.join(", "))
    }
}

// ========== Sound ==========

/// Turns white noise on, optionally at a volume and over a transition.
#[must_use]
pub fn turn_on(volume: Option<Percentage>, duration: Option<TransitionDuration>) -> Command {
    let cmd = Command::new().with_on(true).with_optional_duration(duration);
    match volume {
        Some(volume) => cmd.with_volume(volume),
        None => cmd,
    }
}

/// Turns white noise off, optionally over a transition.
#[must_use]
pub fn turn_off(duration: Option<TransitionDuration>) -> Command {
    Command::new()
        .with_on(false)
        .with_optional_duration(duration)
}

/// Sets the white noise volume.
#[must_use]
pub fn set_volume(volume: Percentage) -> Command {
    Command::new().with_volume(volume)
}

// ========== Airflow ==========

/// Turns the fan on, optionally at a speed and over a transition.
#[must_use]
pub fn turn_fan_on(speed: Option<Percentage>, duration: Option<TransitionDuration>) -> Command {
    let cmd = Command::new()
        .with_fan_on(true)
        .with_optional_duration(duration);
    match speed {
        Some(speed) => cmd.with_fan_speed(speed),
        None => cmd,
    }
}

/// Turns the fan off and disables automatic airflow.
#[must_use]
pub fn turn_fan_off(duration: Option<TransitionDuration>) -> Command {
    Command::new()
        .with_fan_on(false)
        .with_fan_auto_enabled(false)
        .with_optional_duration(duration)
}

/// Sets the fan speed.
#[must_use]
pub fn set_fan_speed(speed: Percentage) -> Command {
    Command::new().with_fan_speed(speed)
}

/// Enables temperature-driven airflow.
#[must_use]
pub fn enable_auto_temp() -> Command {
    Command::new().with_fan_auto_enabled(true)
}

/// Disables temperature-driven airflow.
#[must_use]
pub fn disable_auto_temp() -> Command {
    Command::new().with_fan_auto_enabled(false)
}

/// Sets the auto-airflow target temperature.
#[must_use]
pub fn set_temp_target(target: TargetTemperature) -> Command {
    Command::new().with_target_temperature(target)
}

// ========== Light ==========

/// Turns the button light on, optionally at a brightness.
#[must_use]
pub fn turn_light_on(brightness: Option<Percentage>) -> Command {
    let cmd = Command::new().with_light_on(true);
    match brightness {
        Some(brightness) => cmd.with_light_brightness(brightness),
        None => cmd,
    }
}

/// Turns the button light off.
#[must_use]
pub fn turn_light_off() -> Command {
    Command::new().with_light_on(false)
}

/// Enables night mode.
#[must_use]
pub fn enable_night_mode() -> Command {
    Command::new().with_night_mode_enabled(true)
}

/// Disables night mode.
#[must_use]
pub fn disable_night_mode() -> Command {
    Command::new().with_night_mode_enabled(false)
}
