// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport abstraction for reaching a SNOOZ device.
//!
//! The BLE link itself lives outside this crate. A host supplies an
//! implementation of [`Transport`] keyed by a [`DeviceAddress`]; the
//! [`DeviceSession`](crate::session::DeviceSession) is the only component
//! that opens, writes to, or closes it.
//!
//! An in-memory implementation for tests lives in
//! [`testing::MockTransport`](crate::testing::MockTransport).

use std::fmt;
use std::future::Future;

use tokio::sync::mpsc;

use crate::command::Command;
use crate::error::TransportError;
use crate::state::DeviceState;
use crate::types::DeviceAddress;

/// Unsolicited event pushed by a connected transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The device reported a new full state.
    State(DeviceState),
    /// The link dropped.
    Disconnected,
}

/// A field of the BLE Device Information service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoField {
    /// Manufacturer name string.
    Manufacturer,
    /// Hardware revision string.
    Hardware,
    /// Software revision string. Not exposed by every firmware.
    Software,
    /// Firmware revision string. Not exposed by every firmware.
    Firmware,
}

impl InfoField {
    /// Returns `true` if every device exposes this field.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Manufacturer | Self::Hardware)
    }
}

impl fmt::Display for InfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Manufacturer => "manufacturer",
            Self::Hardware => "hardware",
            Self::Software => "software",
            Self::Firmware => "firmware",
        };
        f.write_str(name)
    }
}

/// Trait for link implementations that carry commands to a SNOOZ device.
///
/// Implementors may write these methods as plain `async fn`; the returned
/// futures must be `Send` so sessions can be driven from spawned tasks.
pub trait Transport: Send + Sync + 'static {
    /// Returns the address this transport is bound to.
    fn address(&self) -> &DeviceAddress;

    /// Opens the link.
    ///
    /// Returns a receiver for unsolicited device events. The receiver
    /// closing is treated like [`TransportEvent::Disconnected`].
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ConnectionFailed` if the device is unreachable.
    fn connect(
        &self,
    ) -> impl Future<Output = Result<mpsc::UnboundedReceiver<TransportEvent>, TransportError>> + Send;

    /// Writes a command and waits for the device to acknowledge it.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the write fails or the link is down.
    fn write(&self, command: &Command) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Reads a raw Device Information value.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ReadFailed` if the field is not available.
    fn read_info(
        &self,
        field: InfoField,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// Closes the link.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if closing fails. The link is considered
    /// closed either way.
    fn disconnect(&self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields() {
        assert!(InfoField::Manufacturer.is_required());
        assert!(InfoField::Hardware.is_required());
        assert!(!InfoField::Software.is_required());
        assert!(!InfoField::Firmware.is_required());
    }

    #[test]
    fn field_display() {
        assert_eq!(InfoField::Firmware.to_string(), "firmware");
    }
}
