// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport for tests.
//!
//! [`MockTransport`] behaves like a well-mannered SNOOZ device: it applies
//! written commands to its own state, answers Device Information reads and
//! can push notifications or drop the link on demand. It is a cheap clone
//! handle, so a test keeps one copy to steer the device while the session
//! owns another.
//!
//! # Examples
//!
//! ```
//! use snooz_lib::command::turn_light_off;
//! use snooz_lib::session::{DeviceSession, SessionConfig};
//! use snooz_lib::testing::{MockTransport, advertisement};
//! use snooz_lib::types::{DeviceAddress, DeviceModel};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mock = MockTransport::new(DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap());
//! let session = DeviceSession::new(mock.clone(), advertisement(DeviceModel::Pro), SessionConfig::default());
//!
//! session.execute_command(turn_light_off()).await;
//!
//! assert_eq!(mock.connect_count(), 1);
//! assert_eq!(mock.device_state().light_on(), Some(false));
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::advertisement::DeviceAdvertisementData;
use crate::command::Command;
use crate::error::TransportError;
use crate::state::DeviceState;
use crate::transport::{InfoField, Transport, TransportEvent};
use crate::types::{DeviceAddress, DeviceModel, FirmwareVersion, PairingToken};

/// Pairing token used by [`advertisement`].
pub const TEST_TOKEN: PairingToken =
    PairingToken::from_bytes([0xde, 0xad, 0xbe, 0xef, 0x01, 0x23, 0x45, 0x67]);

/// Builds an advertisement for `model` carrying [`TEST_TOKEN`].
#[must_use]
pub fn advertisement(model: DeviceModel) -> DeviceAdvertisementData {
    let firmware = if model.supports_fan() {
        FirmwareVersion::V6
    } else {
        FirmwareVersion::V4
    };
    DeviceAdvertisementData::new(model, firmware, TEST_TOKEN)
}

#[derive(Debug)]
struct MockInner {
    address: DeviceAddress,
    device_state: Mutex<DeviceState>,
    info: Mutex<HashMap<InfoField, Vec<u8>>>,
    writes: Mutex<Vec<Command>>,
    events: Mutex<Option<mpsc::UnboundedSender<TransportEvent>>>,
    write_latency: Mutex<Duration>,
    connected: AtomicBool,
    fail_connect: AtomicBool,
    fail_writes: AtomicBool,
    unresponsive: AtomicBool,
    connect_count: AtomicUsize,
    disconnect_count: AtomicUsize,
}

/// Scriptable in-memory [`Transport`].
#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Arc<MockInner>,
}

impl MockTransport {
    /// Creates a responsive device at `address` with default metadata.
    #[must_use]
    pub fn new(address: DeviceAddress) -> Self {
        let info = HashMap::from([
            (InfoField::Manufacturer, b"SNOOZ, LLC".to_vec()),
            (InfoField::Hardware, b"1.0".to_vec()),
            (InfoField::Firmware, b"2.0.5".to_vec()),
        ]);
        Self {
            inner: Arc::new(MockInner {
                address,
                device_state: Mutex::new(DeviceState::new()),
                info: Mutex::new(info),
                writes: Mutex::new(Vec::new()),
                events: Mutex::new(None),
                write_latency: Mutex::new(Duration::ZERO),
                connected: AtomicBool::new(false),
                fail_connect: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
                unresponsive: AtomicBool::new(false),
                connect_count: AtomicUsize::new(0),
                disconnect_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Sets the state the device starts in.
    #[must_use]
    pub fn with_device_state(self, state: DeviceState) -> Self {
        *self.inner.device_state.lock() = state;
        self
    }

    /// Sets how long each write takes to be acknowledged.
    #[must_use]
    pub fn with_write_latency(self, latency: Duration) -> Self {
        self.set_write_latency(latency);
        self
    }

    // ========== Scripting ==========

    /// Changes the write latency.
    pub fn set_write_latency(&self, latency: Duration) {
        *self.inner.write_latency.lock() = latency;
    }

    /// Makes subsequent connects fail.
    pub fn set_fail_connect(&self, fail: bool) {
        self.inner.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes Device Information reads hang forever.
    pub fn set_unresponsive(&self, unresponsive: bool) {
        self.inner.unresponsive.store(unresponsive, Ordering::SeqCst);
    }

    /// Sets or removes a Device Information value.
    pub fn set_info(&self, field: InfoField, value: Option<&[u8]>) {
        let mut info = self.inner.info.lock();
        match value {
            Some(value) => info.insert(field, value.to_vec()),
            None => info.remove(&field),
        };
    }

    /// Pushes an unsolicited state notification.
    ///
    /// Returns `false` if no connection is open.
    pub fn push_state(&self, state: DeviceState) -> bool {
        *self.inner.device_state.lock() = state.clone();
        self.send_event(TransportEvent::State(state))
    }

    /// Simulates the device dropping the link.
    pub fn trigger_disconnect(&self) {
        self.inner.connected.store(false, Ordering::SeqCst);
        self.send_event(TransportEvent::Disconnected);
        self.inner.events.lock().take();
    }

    fn send_event(&self, event: TransportEvent) -> bool {
        self.inner
            .events
            .lock()
            .as_ref()
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    // ========== Inspection ==========

    /// Returns every command written so far, ramp steps included.
    #[must_use]
    pub fn writes(&self) -> Vec<Command> {
        self.inner.writes.lock().clone()
    }

    /// Returns the most recent write.
    #[must_use]
    pub fn last_write(&self) -> Option<Command> {
        self.inner.writes.lock().last().copied()
    }

    /// Returns the number of writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.writes.lock().len()
    }

    /// Returns the number of successful connects.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.inner.connect_count.load(Ordering::SeqCst)
    }

    /// Returns the number of disconnect calls.
    #[must_use]
    pub fn disconnect_count(&self) -> usize {
        self.inner.disconnect_count.load(Ordering::SeqCst)
    }

    /// Returns `true` while the link is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Returns the device-side state after all acknowledged writes.
    #[must_use]
    pub fn device_state(&self) -> DeviceState {
        self.inner.device_state.lock().clone()
    }
}

impl Transport for MockTransport {
    fn address(&self) -> &DeviceAddress {
        &self.inner.address
    }

    async fn connect(&self) -> Result<mpsc::UnboundedReceiver<TransportEvent>, TransportError> {
        if self.inner.fail_connect.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionFailed(
                "device not reachable".to_string(),
            ));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.inner.events.lock() = Some(tx);
        self.inner.connected.store(true, Ordering::SeqCst);
        self.inner.connect_count.fetch_add(1, Ordering::SeqCst);
        Ok(rx)
    }

    async fn write(&self, command: &Command) -> Result<(), TransportError> {
        let latency = *self.inner.write_latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(TransportError::WriteFailed("write rejected".to_string()));
        }

        {
            let mut state = self.inner.device_state.lock();
            *state = state.with_command(command);
        }
        self.inner.writes.lock().push(*command);
        Ok(())
    }

    async fn read_info(&self, field: InfoField) -> Result<Vec<u8>, TransportError> {
        if self.inner.unresponsive.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        self.inner
            .info
            .lock()
            .get(&field)
            .cloned()
            .ok_or_else(|| TransportError::ReadFailed(format!("{field} not available")))
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.inner.disconnect_count.fetch_add(1, Ordering::SeqCst);
        self.inner.connected.store(false, Ordering::SeqCst);
        self.inner.events.lock().take();
        Ok(())
    }
}
