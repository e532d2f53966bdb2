// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lifecycle events published by the [`DeviceManager`](crate::manager::DeviceManager).
//!
//! The [`EventBus`] uses tokio's broadcast channel so a host can watch device
//! additions, removals and reload requests from several places at once.
//!
//! # Examples
//!
//! ```
//! use snooz_lib::event::{DeviceEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::device_removed("bedroom"));
//! assert_eq!(rx.try_recv().unwrap().device_id(), "bedroom");
//! ```

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub use event_bus::EventBus;
