// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The closed set of features a SNOOZ device exposes.

use std::fmt;

use crate::command::{self, Command};
use crate::error::{Error, Result};
use crate::state::DeviceState;
use crate::types::{DeviceAddress, Percentage, TargetTemperature, TransitionDuration};

use super::{EntityState, HvacAction, HvacMode, from_device_brightness};

/// One controllable capability of a device, exposed as one host entity.
///
/// # Examples
///
/// ```
/// use snooz_lib::entity::Feature;
/// use snooz_lib::state::DeviceState;
/// use snooz_lib::types::Percentage;
///
/// let mut state = DeviceState::new();
/// state.set_fan_on(true);
/// state.set_fan_speed(Percentage::new(35).unwrap());
///
/// let entity = Feature::Airflow.read(&state);
/// assert_eq!(entity.is_on(), Some(true));
/// assert_eq!(entity.percentage(), Some(Percentage::new(35).unwrap()));
///
/// // a percentage of zero turns the feature off
/// let cmd = Feature::Airflow.set_percentage_command(Percentage::MIN).unwrap();
/// assert_eq!(cmd.fan_on(), Some(false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// White noise, exposed as a fan with a volume percentage.
    Sound,
    /// Breez airflow fan.
    Airflow,
    /// Button light with brightness.
    Light,
    /// Night mode switch.
    NightMode,
    /// Temperature-driven airflow, exposed as a climate entity.
    Climate,
}

impl Feature {
    /// Every feature, in the order entities are created.
    pub const ALL: [Self; 5] = [
        Self::Sound,
        Self::Airflow,
        Self::Light,
        Self::NightMode,
        Self::Climate,
    ];

    /// Returns the suffix appended to the device address to form the
    /// entity's unique id.
    #[must_use]
    pub const fn unique_id_suffix(self) -> &'static str {
        match self {
            Self::Sound => "",
            Self::Airflow => "-airflow",
            Self::Light => "-light",
            Self::NightMode => "-night-mode",
            Self::Climate => "-auto-airflow",
        }
    }

    /// Returns the entity's unique id for a device.
    #[must_use]
    pub fn unique_id(self, address: &DeviceAddress) -> String {
        format!("{address}{}", self.unique_id_suffix())
    }

    /// Returns the key a host uses to look up the entity's display name.
    #[must_use]
    pub const fn translation_key(self) -> &'static str {
        match self {
            Self::Sound => "sound",
            Self::Airflow => "airflow",
            Self::Light => "button_lights",
            Self::NightMode => "night_mode",
            Self::Climate => "auto_airflow",
        }
    }

    /// Projects a device snapshot onto this feature.
    #[must_use]
    pub fn read(self, state: &DeviceState) -> EntityState {
        let mut entity = EntityState::new();
        match self {
            Self::Sound => {
                entity.is_on = state.on();
                entity.percentage = state.volume();
            }
            Self::Airflow => {
                entity.is_on = state.fan_on();
                entity.percentage = state.fan_speed();
            }
            Self::Light => {
                entity.is_on = state.light_on();
                entity.brightness = state.light_brightness().map(from_device_brightness);
            }
            Self::NightMode => {
                entity.is_on = state.night_mode_enabled();
            }
            Self::Climate => {
                entity.hvac_mode = state.fan_auto_enabled().map(|auto| {
                    if auto {
                        HvacMode::FanOnly
                    } else {
                        HvacMode::Off
                    }
                });
                entity.hvac_action = state.fan_on().map(|on| {
                    if on {
                        HvacAction::Fan
                    } else {
                        HvacAction::Off
                    }
                });
                entity.target_temperature = state.target_temperature();
                entity.current_temperature = state.temperature();
            }
        }
        entity
    }

    /// Builds the command that turns this feature on.
    ///
    /// `level` is the device-scale volume, fan speed or light brightness.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFeature` for the climate feature, for a
    /// level on night mode, or for a duration on anything but sound and
    /// airflow.
    pub fn turn_on_command(
        self,
        level: Option<Percentage>,
        duration: Option<TransitionDuration>,
    ) -> Result<Command> {
        match self {
            Self::Sound => Ok(command::turn_on(level, duration)),
            Self::Airflow => Ok(command::turn_fan_on(level, duration)),
            Self::Light => {
                self.reject_duration(duration)?;
                Ok(command::turn_light_on(level))
            }
            Self::NightMode => {
                self.reject_duration(duration)?;
                if level.is_some() {
                    return Err(self.unsupported("set_percentage"));
                }
                Ok(command::enable_night_mode())
            }
            Self::Climate => Err(self.unsupported("turn_on")),
        }
    }

    /// Builds the command that turns this feature off.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFeature` for the climate feature, or for a
    /// duration on anything but sound and airflow.
    pub fn turn_off_command(self, duration: Option<TransitionDuration>) -> Result<Command> {
        match self {
            Self::Sound => Ok(command::turn_off(duration)),
            Self::Airflow => Ok(command::turn_fan_off(duration)),
            Self::Light => {
                self.reject_duration(duration)?;
                Ok(command::turn_light_off())
            }
            Self::NightMode => {
                self.reject_duration(duration)?;
                Ok(command::disable_night_mode())
            }
            Self::Climate => Err(self.unsupported("turn_off")),
        }
    }

    /// Builds the command that sets this feature's level.
    ///
    /// A percentage of zero turns the feature off instead.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFeature` unless this is sound or airflow.
    pub fn set_percentage_command(self, percentage: Percentage) -> Result<Command> {
        match self {
            Self::Sound | Self::Airflow if percentage.is_zero() => self.turn_off_command(None),
            Self::Sound => Ok(command::set_volume(percentage)),
            Self::Airflow => Ok(command::set_fan_speed(percentage)),
            Self::Light | Self::NightMode | Self::Climate => {
                Err(self.unsupported("set_percentage"))
            }
        }
    }

    /// Builds the command that selects an HVAC mode.
    ///
    /// `FanOnly` enables automatic airflow; `Off` stops the fan and disables
    /// it.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFeature` unless this is the climate feature.
    pub fn hvac_mode_command(self, mode: HvacMode) -> Result<Command> {
        if self != Self::Climate {
            return Err(self.unsupported("set_hvac_mode"));
        }
        Ok(match mode {
            HvacMode::FanOnly => command::enable_auto_temp(),
            HvacMode::Off => command::turn_fan_off(None),
        })
    }

    /// Builds the command that sets the auto-airflow target temperature.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFeature` unless this is the climate feature.
    pub fn temperature_command(self, target: TargetTemperature) -> Result<Command> {
        if self != Self::Climate {
            return Err(self.unsupported("set_temperature"));
        }
        Ok(command::set_temp_target(target))
    }

    fn reject_duration(self, duration: Option<TransitionDuration>) -> Result<()> {
        match duration {
            Some(_) => Err(self.unsupported("transition")),
            None => Ok(()),
        }
    }

    fn unsupported(self, operation: &'static str) -> Error {
        Error::UnsupportedFeature {
            feature: self.translation_key(),
            operation,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.translation_key())
    }
}
