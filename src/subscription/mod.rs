// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for device state changes.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches snapshots
//! - [`Subscription`] - Handle returned to callers, used to unsubscribe
//!
//! # Usage
//!
//! Subscriptions are created through
//! [`DeviceSession::subscribe_to_state_change`](crate::session::DeviceSession::subscribe_to_state_change):
//!
//! ```
//! use snooz_lib::session::{DeviceSession, SessionConfig};
//! use snooz_lib::testing::{MockTransport, advertisement};
//! use snooz_lib::types::{DeviceAddress, DeviceModel};
//!
//! let session = DeviceSession::new(
//!     MockTransport::new(DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap()),
//!     advertisement(DeviceModel::Breez),
//!     SessionConfig::default(),
//! );
//!
//! let sub = session.subscribe_to_state_change(|state| {
//!     println!("volume is now {:?}", state.volume());
//! });
//!
//! // Later
//! sub.unsubscribe();
//! ```

mod callback;
mod handle;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use handle::Subscription;
