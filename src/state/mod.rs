// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state and metadata types.
//!
//! [`DeviceState`] is the live snapshot a session publishes after every
//! change, while [`DeviceInfo`] is the static metadata read once at setup.
//!
//! # Examples
//!
//! ```
//! use snooz_lib::command::turn_light_on;
//! use snooz_lib::state::DeviceState;
//! use snooz_lib::types::Percentage;
//!
//! let state = DeviceState::new();
//! let next = state.with_command(&turn_light_on(Some(Percentage::new(30).unwrap())));
//!
//! assert_eq!(next.light_on(), Some(true));
//! assert_eq!(next.light_brightness(), Some(Percentage::new(30).unwrap()));
//! ```

mod device_info;
mod device_state;

pub use device_info::DeviceInfo;
pub use device_state::DeviceState;
