// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for SNOOZ device control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time, so commands built from them can always be sent.
//!
//! # Types
//!
//! - [`DeviceAddress`] - Hardware identifier of a BLE device
//! - [`DeviceModel`] - Original, Pro or Breez
//! - [`FirmwareVersion`] - Firmware protocol generation
//! - [`PairingToken`] - 8-byte write authorization token
//! - [`Percentage`] - Volume, fan speed and brightness (0-100%)
//! - [`TargetTemperature`] - Auto-airflow threshold (32-120°F)
//! - [`TransitionDuration`] - Ramp duration (1-300 s)

mod address;
mod model;
mod percentage;
mod temperature;
mod transition;

pub use address::DeviceAddress;
pub use model::{DeviceModel, FirmwareVersion, PairingToken};
pub use percentage::Percentage;
pub use temperature::TargetTemperature;
pub use transition::TransitionDuration;
