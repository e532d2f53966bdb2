// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing feature adapters.
//!
//! Each controllable capability of a device is exposed to the host as one
//! entity. A [`Feature`] translates between session state and the
//! [`EntityState`] a host displays, and builds the commands behind entity
//! operations. A [`FeatureEntity`] binds a feature to a shared session and
//! keeps the last known good state for when the device is out of reach.
//!
//! | Feature | Reads | Operations |
//! |---------|-------|------------|
//! | [`Feature::Sound`] | `on`, `volume` | on/off (ramped), set percentage |
//! | [`Feature::Airflow`] | `fan_on`, `fan_speed` | on/off (ramped), set percentage |
//! | [`Feature::Light`] | `light_on`, `light_brightness` | on (with brightness)/off |
//! | [`Feature::NightMode`] | `night_mode_enabled` | on/off |
//! | [`Feature::Climate`] | auto airflow, temperatures | HVAC mode, target temperature |

mod feature;
mod feature_entity;

pub use feature::Feature;
pub use feature_entity::FeatureEntity;

use std::fmt;

use crate::types::{Percentage, TargetTemperature};

/// HVAC mode of the auto-airflow climate entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    /// Automatic airflow disabled.
    Off,
    /// Automatic airflow enabled.
    FanOnly,
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::FanOnly => f.write_str("fan_only"),
        }
    }
}

/// What the climate entity is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    /// Fan stopped.
    Off,
    /// Fan running.
    Fan,
}

/// State of one entity as shown to the host.
///
/// Only the fields meaningful for the entity's [`Feature`] are set. The type
/// is serializable so a host can persist it and hand it back through
/// [`FeatureEntity::restore`].
///
/// # Examples
///
/// ```
/// use snooz_lib::entity::EntityState;
/// use snooz_lib::types::Percentage;
///
/// let state = EntityState::new()
///     .with_is_on(true)
///     .with_percentage(Percentage::new(40).unwrap());
///
/// let json = serde_json::to_string(&state).unwrap();
/// assert_eq!(json, r#"{"is_on":true,"percentage":40}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntityState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentage: Option<Percentage>,
    /// Host brightness scale, 0-255.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    brightness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hvac_mode: Option<HvacMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hvac_action: Option<HvacAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_temperature: Option<TargetTemperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_temperature: Option<f32>,
}

macro_rules! entity_field {
    ($field:ident, $with:ident, $ty:ty) => {
        #[doc = concat!("Returns `", stringify!($field), "`, if known.")]
        #[must_use]
        pub fn $field(&self) -> Option<$ty> {
            self.$field
        }

        #[doc = concat!("Sets `", stringify!($field), "`.")]
        #[must_use]
        pub fn $with(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

impl EntityState {
    /// Creates a state where everything is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    entity_field!(is_on, with_is_on, bool);
    entity_field!(percentage, with_percentage, Percentage);
    entity_field!(brightness, with_brightness, u8);
    entity_field!(hvac_mode, with_hvac_mode, HvacMode);
    entity_field!(hvac_action, with_hvac_action, HvacAction);
    entity_field!(target_temperature, with_target_temperature, TargetTemperature);
    entity_field!(current_temperature, with_current_temperature, f32);
}

/// Converts a device brightness (0-100) to the host scale (0-255).
///
/// # Examples
///
/// ```
/// use snooz_lib::entity::from_device_brightness;
/// use snooz_lib::types::Percentage;
///
/// assert_eq!(from_device_brightness(Percentage::MAX), 255);
/// assert_eq!(from_device_brightness(Percentage::new(20).unwrap()), 51);
/// ```
#[must_use]
pub fn from_device_brightness(brightness: Percentage) -> u8 {
    let scaled = (u32::from(brightness.value()) * 255 + 50) / 100;
    u8::try_from(scaled).unwrap_or(u8::MAX)
}

/// Converts a host brightness (0-255) to the device scale (0-100).
///
/// # Examples
///
/// ```
/// use snooz_lib::entity::to_device_brightness;
///
/// assert_eq!(to_device_brightness(255).value(), 100);
/// assert_eq!(to_device_brightness(128).value(), 50);
/// ```
#[must_use]
pub fn to_device_brightness(brightness: u8) -> Percentage {
    let scaled = (u32::from(brightness) * 100 + 127) / 255;
    Percentage::clamped(u8::try_from(scaled).unwrap_or(u8::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_round_trip_is_stable() {
        for device in 0..=100 {
            let p = Percentage::new(device).unwrap();
            assert_eq!(to_device_brightness(from_device_brightness(p)), p);
        }
    }

    #[test]
    fn brightness_bounds() {
        assert_eq!(from_device_brightness(Percentage::MIN), 0);
        assert_eq!(to_device_brightness(0), Percentage::MIN);
        assert_eq!(to_device_brightness(1).value(), 0);
        assert_eq!(to_device_brightness(3).value(), 1);
    }

    #[test]
    fn entity_state_deserializes_partial() {
        let state: EntityState =
            serde_json::from_str(r#"{"hvac_mode":"fan_only","target_temperature":70}"#).unwrap();
        assert_eq!(state.hvac_mode(), Some(HvacMode::FanOnly));
        assert_eq!(
            state.target_temperature(),
            Some(TargetTemperature::new(70).unwrap())
        );
        assert!(state.is_on().is_none());
    }
}
