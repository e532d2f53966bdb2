// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use crate::command::Command;
use crate::types::{Percentage, TargetTemperature};

/// Live state of a SNOOZ device.
///
/// All fields are optional because state is unknown until the device
/// reports it. A session never mutates a published snapshot; it builds the
/// next one with [`with_command`](Self::with_command) or receives a fresh one
/// from the device and swaps it in whole.
///
/// # Examples
///
/// ```
/// use snooz_lib::command::turn_on;
/// use snooz_lib::state::DeviceState;
/// use snooz_lib::types::Percentage;
///
/// let mut state = DeviceState::new();
/// state.set_volume(Percentage::new(40).unwrap());
///
/// let next = state.with_command(&turn_on(Some(Percentage::new(75).unwrap()), None));
/// assert_eq!(next.on(), Some(true));
/// assert_eq!(next.volume(), Some(Percentage::new(75).unwrap()));
/// // the original snapshot is untouched
/// assert_eq!(state.on(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceState {
    /// White noise on/off.
    on: Option<bool>,
    /// White noise volume.
    volume: Option<Percentage>,
    /// Airflow fan on/off.
    fan_on: Option<bool>,
    /// Airflow fan speed.
    fan_speed: Option<Percentage>,
    /// Automatic airflow based on temperature.
    fan_auto_enabled: Option<bool>,
    /// Auto-airflow threshold.
    target_temperature: Option<TargetTemperature>,
    /// Measured temperature in degrees Fahrenheit.
    temperature: Option<f32>,
    /// Button light on/off.
    light_on: Option<bool>,
    /// Button light brightness.
    light_brightness: Option<Percentage>,
    /// Night mode (dimmed buttons) enabled.
    night_mode_enabled: Option<bool>,
}

impl DeviceState {
    /// Creates a new state where everything is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Sound ==========

    /// Gets whether white noise is on.
    #[must_use]
    pub fn on(&self) -> Option<bool> {
        self.on
    }

    /// Sets whether white noise is on.
    pub fn set_on(&mut self, on: bool) {
        self.on = Some(on);
    }

    /// Gets the white noise volume.
    #[must_use]
    pub fn volume(&self) -> Option<Percentage> {
        self.volume
    }

    /// Sets the white noise volume.
    pub fn set_volume(&mut self, volume: Percentage) {
        self.volume = Some(volume);
    }

    // ========== Airflow ==========

    /// Gets whether the fan is on.
    #[must_use]
    pub fn fan_on(&self) -> Option<bool> {
        self.fan_on
    }

    /// Sets whether the fan is on.
    pub fn set_fan_on(&mut self, on: bool) {
        self.fan_on = Some(on);
    }

    /// Gets the fan speed.
    #[must_use]
    pub fn fan_speed(&self) -> Option<Percentage> {
        self.fan_speed
    }

    /// Sets the fan speed.
    pub fn set_fan_speed(&mut self, speed: Percentage) {
        self.fan_speed = Some(speed);
    }

    /// Gets whether automatic airflow is enabled.
    #[must_use]
    pub fn fan_auto_enabled(&self) -> Option<bool> {
        self.fan_auto_enabled
    }

    /// Sets whether automatic airflow is enabled.
    pub fn set_fan_auto_enabled(&mut self, enabled: bool) {
        self.fan_auto_enabled = Some(enabled);
    }

    /// Gets the auto-airflow target temperature.
    #[must_use]
    pub fn target_temperature(&self) -> Option<TargetTemperature> {
        self.target_temperature
    }

    /// Sets the auto-airflow target temperature.
    pub fn set_target_temperature(&mut self, target: TargetTemperature) {
        self.target_temperature = Some(target);
    }

    /// Gets the measured temperature in degrees Fahrenheit.
    #[must_use]
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Sets the measured temperature.
    pub fn set_temperature(&mut self, fahrenheit: f32) {
        self.temperature = Some(fahrenheit);
    }

    // ========== Light ==========

    /// Gets whether the button light is on.
    #[must_use]
    pub fn light_on(&self) -> Option<bool> {
        self.light_on
    }

    /// Sets whether the button light is on.
    pub fn set_light_on(&mut self, on: bool) {
        self.light_on = Some(on);
    }

    /// Gets the button light brightness.
    #[must_use]
    pub fn light_brightness(&self) -> Option<Percentage> {
        self.light_brightness
    }

    /// Sets the button light brightness.
    pub fn set_light_brightness(&mut self, brightness: Percentage) {
        self.light_brightness = Some(brightness);
    }

    /// Gets whether night mode is enabled.
    #[must_use]
    pub fn night_mode_enabled(&self) -> Option<bool> {
        self.night_mode_enabled
    }

    /// Sets whether night mode is enabled.
    pub fn set_night_mode_enabled(&mut self, enabled: bool) {
        self.night_mode_enabled = Some(enabled);
    }

    // ========== Commands ==========

    /// Returns the snapshot that results from applying a command.
    ///
    /// Fields the command leaves unset keep their current value.
    #[must_use]
    pub fn with_command(&self, command: &Command) -> Self {
        let mut next = self.clone();

        macro_rules! update_if_some {
            ($field:ident) => {
                if let Some(v) = command.$field() {
                    next.$field = Some(v);
                }
            };
        }

        update_if_some!(on);
        update_if_some!(volume);
        update_if_some!(fan_on);
        update_if_some!(fan_speed);
        update_if_some!(fan_auto_enabled);
        update_if_some!(target_temperature);
        update_if_some!(light_on);
        update_if_some!(light_brightness);
        update_if_some!(night_mode_enabled);

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{self, Command};

    fn pct(value: u8) -> Percentage {
        Percentage::new(value).unwrap()
    }

    #[test]
    fn new_state_is_unknown() {
        let state = DeviceState::new();
        assert!(state.on().is_none());
        assert!(state.volume().is_none());
        assert!(state.fan_on().is_none());
        assert!(state.temperature().is_none());
        assert!(state.night_mode_enabled().is_none());
    }

    #[test]
    fn command_updates_only_specified_fields() {
        let mut state = DeviceState::new();
        state.set_on(false);
        state.set_volume(pct(40));
        state.set_light_on(true);
        state.set_temperature(71.5);

        let next = state.with_command(&command::set_volume(pct(75)));

        assert_eq!(next.volume(), Some(pct(75)));
        assert_eq!(next.on(), Some(false));
        assert_eq!(next.light_on(), Some(true));
        assert_eq!(next.temperature(), Some(71.5));
    }

    #[test]
    fn empty_command_is_identity() {
        let mut state = DeviceState::new();
        state.set_fan_speed(pct(30));
        assert_eq!(state.with_command(&Command::new()), state);
    }

    #[test]
    fn climate_command() {
        let state = DeviceState::new();
        let target = TargetTemperature::new(70).unwrap();

        let next = state.with_command(&command::set_temp_target(target));
        assert_eq!(next.target_temperature(), Some(target));

        let next = next.with_command(&command::enable_auto_temp());
        assert_eq!(next.fan_auto_enabled(), Some(true));
        assert_eq!(next.target_temperature(), Some(target));
    }
}
