// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host integration layer.
//!
//! This module turns stored configuration entries into live devices and
//! exposes the services a home automation host registers for them.
//!
//! # Overview
//!
//! - [`EntryData`]: the persisted entry, with version migration
//! - [`ConfiguredDevice`]: a set-up device with its registry metadata and
//!   entities
//! - [`DeviceManager`]: the registry of configured devices and the
//!   [`TransitionOn`] / [`TransitionOff`] services
//!
//! # Examples
//!
//! ```
//! use snooz_lib::manager::{ConfiguredDevice, DeviceManager, EntryData, TransitionOn};
//! use snooz_lib::session::SessionConfig;
//! use snooz_lib::testing::{MockTransport, advertisement};
//! use snooz_lib::types::{DeviceAddress, DeviceModel, Percentage, TransitionDuration};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> snooz_lib::Result<()> {
//! let address = DeviceAddress::new("AA:BB:CC:DD:EE:FF")?;
//! let entry = EntryData::new(address.clone(), &advertisement(DeviceModel::Original));
//!
//! let device = ConfiguredDevice::setup(
//!     MockTransport::new(address),
//!     &entry,
//!     "Nursery",
//!     SessionConfig::default(),
//! )
//! .await?;
//!
//! let manager = DeviceManager::new();
//! manager.add_device("nursery", device).await;
//!
//! let request = TransitionOn::new(["nursery"])
//!     .with_volume(Percentage::new(50)?)
//!     .with_duration(TransitionDuration::new(1)?);
//! let results = manager.transition_on(&request).await?;
//! assert!(results[0].1.is_successful());
//! # Ok(())
//! # }
//! ```

mod configured_device;
mod device_manager;
mod entry;
mod services;

pub use configured_device::{CONNECTION_BLUETOOTH, ConfiguredDevice, DOMAIN, RegistryInfo};
pub use device_manager::DeviceManager;
pub use entry::EntryData;
pub use services::{TransitionOff, TransitionOn};
