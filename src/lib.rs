// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `snooz_lib` - Control SNOOZ white noise machines and Breez fans over BLE.
//!
//! This library provides an async session per device that executes state
//! commands, ramps volume and fan speed over time, tracks the device state
//! and notifies subscribers, plus the entity and service layer a home
//! automation host builds on.
//!
//! # Supported Features
//!
//! - **White noise**: on/off and volume, with timed transitions
//! - **Airflow** (Breez): fan on/off, speed, and temperature-driven auto mode
//! - **Button lights**: on/off and brightness
//! - **Night mode**
//! - **Device information**: manufacturer, hardware and software revisions
//!
//! # Supported Models
//!
//! - SNOOZ Original
//! - SNOOZ Pro
//! - Breez
//!
//! # Architecture
//!
//! The BLE stack stays outside this crate. A host implements
//! [`transport::Transport`] on top of its Bluetooth library; everything
//! above that trait is provided here:
//!
//! | Layer | Module |
//! |-------|--------|
//! | Advertisement parsing | [`advertisement`] |
//! | Per-device session | [`session`] |
//! | Host entities | [`entity`] |
//! | Entries, setup and services | [`manager`] |
//!
//! # Quick Start
//!
//! ```
//! use snooz_lib::{DeviceSession, SessionConfig};
//! use snooz_lib::command::{turn_off, turn_on};
//! use snooz_lib::testing::{MockTransport, advertisement};
//! use snooz_lib::types::{DeviceAddress, DeviceModel, Percentage, TransitionDuration};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> snooz_lib::Result<()> {
//! let session = DeviceSession::new(
//!     MockTransport::new(DeviceAddress::new("AA:BB:CC:DD:EE:FF")?),
//!     advertisement(DeviceModel::Original),
//!     SessionConfig::default(),
//! );
//!
//! let subscription = session.subscribe_to_state_change(|state| {
//!     println!("volume is now {:?}", state.volume());
//! });
//!
//! let result = session.execute_command(turn_on(Some(Percentage::new(40)?), None)).await;
//! assert!(result.is_successful());
//!
//! // ramp down over one second
//! session
//!     .execute_command(turn_off(Some(TransitionDuration::new(1)?)))
//!     .await;
//! assert_eq!(session.state().on(), Some(false));
//!
//! subscription.unsubscribe();
//! session.disconnect().await;
//! # Ok(())
//! # }
//! ```

pub mod advertisement;
pub mod command;
pub mod entity;
pub mod error;
pub mod event;
pub mod manager;
pub mod session;
pub mod state;
pub mod subscription;
pub mod testing;
pub mod transport;
pub mod types;

pub use advertisement::{DeviceAdvertisementData, parse_advertisement};
pub use command::{Command, CommandFailure, CommandResult, CommandResultStatus};
pub use entity::{EntityState, Feature, FeatureEntity};
pub use error::{Error, ParseError, Result, TransportError, ValueError};
pub use manager::{ConfiguredDevice, DeviceManager, EntryData, TransitionOff, TransitionOn};
pub use session::{DeviceSession, SessionConfig};
pub use state::{DeviceInfo, DeviceState};
pub use subscription::{Subscription, SubscriptionId};
pub use transport::{InfoField, Transport, TransportEvent};
pub use types::{
    DeviceAddress, DeviceModel, FirmwareVersion, PairingToken, Percentage, TargetTemperature,
    TransitionDuration,
};
