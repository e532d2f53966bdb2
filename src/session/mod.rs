// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device command and state session.
//!
//! A [`DeviceSession`] owns the link to one SNOOZ device. It connects lazily,
//! executes [`Command`]s one at a time, keeps the latest [`DeviceState`]
//! snapshot and notifies subscribers whenever that snapshot is replaced.
//!
//! # Preemption
//!
//! At most one command is in flight. Submitting a new command cancels the
//! current one, which resolves [`CommandResultStatus::Cancelled`] right away
//! while the new command proceeds.
//!
//! # Examples
//!
//! ```
//! use snooz_lib::command::turn_on;
//! use snooz_lib::session::{DeviceSession, SessionConfig};
//! use snooz_lib::testing::{MockTransport, advertisement};
//! use snooz_lib::types::{DeviceAddress, DeviceModel, Percentage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let session = DeviceSession::new(
//!     MockTransport::new(DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap()),
//!     advertisement(DeviceModel::Original),
//!     SessionConfig::default(),
//! );
//!
//! let result = session
//!     .execute_command(turn_on(Some(Percentage::new(60).unwrap()), None))
//!     .await;
//!
//! assert!(result.is_successful());
//! assert!(session.is_connected());
//! assert_eq!(session.state().volume(), Some(Percentage::new(60).unwrap()));
//! # }
//! ```

mod config;
mod ramp;

pub use config::SessionConfig;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::advertisement::DeviceAdvertisementData;
use crate::command::{Command, CommandResult, CommandResultStatus};
use crate::error::{Error, TransportError};
use crate::state::{DeviceInfo, DeviceState};
use crate::subscription::{CallbackRegistry, Subscription};
use crate::transport::{InfoField, Transport, TransportEvent};
use crate::types::DeviceAddress;

use ramp::Ramp;

/// State shared with the notification listener task.
#[derive(Debug)]
struct Shared {
    address: DeviceAddress,
    state: RwLock<Arc<DeviceState>>,
    callbacks: Arc<CallbackRegistry>,
    connected: watch::Sender<bool>,
    /// Bumped on every connect and disconnect so stale listeners go quiet.
    generation: AtomicU64,
    /// Last acknowledged step of a ramp that never wrote its final command.
    /// A device notification supersedes it.
    ramp_progress: Mutex<Option<Command>>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Swaps in a new snapshot and notifies subscribers.
    fn replace_state(&self, next: DeviceState) {
        let next = Arc::new(next);
        *self.state.write() = Arc::clone(&next);
        tracing::debug!(
            address = %self.address,
            subscribers = self.callbacks.callback_count(),
            "Dispatching state change"
        );
        self.callbacks.dispatch(&next);
    }
}

/// The command currently allowed to write.
#[derive(Debug)]
struct InFlight {
    id: u64,
    cancel: oneshot::Sender<()>,
}

/// Session with a single SNOOZ device.
///
/// The session is `Send + Sync`; wrap it in an `Arc` to share it between
/// the entities that drive the same device.
pub struct DeviceSession<T: Transport> {
    transport: T,
    advertisement: DeviceAdvertisementData,
    config: SessionConfig,
    shared: Arc<Shared>,
    info: RwLock<Option<DeviceInfo>>,
    in_flight: Mutex<Option<InFlight>>,
    next_command_id: AtomicU64,
    listener: Mutex<Option<JoinHandle<()>>>,
    /// Serializes transport writes across commands.
    write_lock: tokio::sync::Mutex<()>,
    connect_lock: tokio::sync::Mutex<()>,
}

impl<T: Transport> DeviceSession<T> {
    /// Creates a session for the device behind `transport`.
    ///
    /// No I/O happens until the first command or info read.
    pub fn new(
        transport: T,
        advertisement: DeviceAdvertisementData,
        config: SessionConfig,
    ) -> Self {
        let (connected, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                address: transport.address().clone(),
                state: RwLock::new(Arc::new(DeviceState::new())),
                callbacks: Arc::new(CallbackRegistry::new()),
                connected,
                generation: AtomicU64::new(0),
                ramp_progress: Mutex::new(None),
            }),
            transport,
            advertisement,
            config,
            info: RwLock::new(None),
            in_flight: Mutex::new(None),
            next_command_id: AtomicU64::new(1),
            listener: Mutex::new(None),
            write_lock: tokio::sync::Mutex::new(()),
            connect_lock: tokio::sync::Mutex::new(()),
        }
    }

    // ========== Accessors ==========

    /// Returns the device address.
    #[must_use]
    pub fn address(&self) -> &DeviceAddress {
        &self.shared.address
    }

    /// Returns the advertisement the session was created from.
    #[must_use]
    pub fn advertisement(&self) -> &DeviceAdvertisementData {
        &self.advertisement
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the device metadata from the last successful
    /// [`get_info`](Self::get_info).
    #[must_use]
    pub fn info(&self) -> Option<DeviceInfo> {
        self.info.read().clone()
    }

    /// Returns `true` while the link is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.shared.connected.borrow()
    }

    /// Returns the latest state snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<DeviceState> {
        Arc::clone(&*self.shared.state.read())
    }

    /// Returns a receiver that observes connection changes.
    #[must_use]
    pub fn connection_watch(&self) -> watch::Receiver<bool> {
        self.shared.connected.subscribe()
    }

    // ========== Subscriptions ==========

    /// Registers a handler called with every new snapshot.
    ///
    /// Handlers run synchronously, in subscription order, once per snapshot
    /// replacement, whether it came from a local command or from the device.
    pub fn subscribe_to_state_change<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.shared.callbacks.on_state_changed(handler);
        Subscription::new(id, Arc::downgrade(&self.shared.callbacks))
    }

    // ========== Queries ==========

    /// Reads the Device Information service.
    ///
    /// Connects first if needed. Returns `None` on connect, read, timeout or
    /// parse failure. A successful result is cached and also returned by
    /// [`info`](Self::info).
    pub async fn get_info(&self) -> Option<DeviceInfo> {
        match self.fetch_info().await {
            Ok(info) => {
                *self.info.write() = Some(info.clone());
                Some(info)
            }
            Err(e) => {
                tracing::warn!(address = %self.address(), error = %e, "Failed to read device info");
                None
            }
        }
    }

    async fn fetch_info(&self) -> Result<DeviceInfo, Error> {
        let fields = match self.read_info_fields().await {
            Ok(fields) => fields,
            Err(e) => {
                self.drop_connection().await;
                return Err(e.into());
            }
        };
        let [manufacturer, hardware, software, firmware] = fields;

        let info = DeviceInfo::parse(
            self.advertisement.model(),
            manufacturer.as_deref().unwrap_or_default(),
            hardware.as_deref().unwrap_or_default(),
            software.as_deref(),
            firmware.as_deref(),
        )?;
        Ok(info)
    }

    async fn read_info_fields(&self) -> Result<[Option<Vec<u8>>; 4], TransportError> {
        self.ensure_connected().await?;

        let mut values = [None, None, None, None];
        let fields = [
            InfoField::Manufacturer,
            InfoField::Hardware,
            InfoField::Software,
            InfoField::Firmware,
        ];
        for (slot, field) in values.iter_mut().zip(fields) {
            let timeout = self.config.command_timeout();
            let read = tokio::time::timeout(timeout, self.transport.read_info(field))
                .await
                .map_err(|_| TransportError::Timeout(millis(timeout)))?;
            *slot = match read {
                Ok(value) => Some(value),
                Err(TransportError::ReadFailed(_)) if !field.is_required() => None,
                Err(e) => return Err(e),
            };
        }
        Ok(values)
    }

    // ========== Commands ==========

    /// Executes a command, preempting any command already in flight.
    ///
    /// Connects first if needed. A command with a duration and a level to
    /// ramp is played as intermediate writes one
    /// [`transition_interval`](SessionConfig::transition_interval) apart,
    /// ending with the command itself. A timed power change without a level
    /// ends at the level the snapshot already holds: the target level for a
    /// fade-in, the starting level for a fade-out.
    ///
    /// On success the snapshot is replaced and subscribers are notified
    /// before this returns. On failure the session is marked disconnected;
    /// the next command reconnects.
    ///
    /// A ramp that is cancelled or fails partway leaves the device at an
    /// intermediate level while the snapshot keeps the previous one. The
    /// next command folds the last acknowledged step into the snapshot
    /// before it writes, notifying subscribers once. A device notification
    /// received in between takes precedence over that step.
    pub async fn execute_command(&self, command: Command) -> CommandResult {
        let started = Instant::now();
        let id = self.next_command_id.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let previous = self.in_flight.lock().replace(InFlight {
            id,
            cancel: cancel_tx,
        });
        if let Some(previous) = previous {
            tracing::debug!(
                address = %self.address(),
                preempted = previous.id,
                command_id = id,
                "Preempting in-flight command"
            );
            let _ = previous.cancel.send(());
        }

        tracing::debug!(address = %self.address(), command_id = id, %command, "Executing command");

        let status = tokio::select! {
            biased;
            _ = cancel_rx => CommandResultStatus::Cancelled,
            outcome = self.run(&command) => match outcome {
                Ok(written) => {
                    let next = self.state().with_command(&written);
                    self.shared.replace_state(next);
                    CommandResultStatus::Successful
                }
                Err(e) => {
                    tracing::warn!(address = %self.address(), %command, error = %e, "Command failed");
                    CommandResultStatus::Failed((&e).into())
                }
            },
        };

        {
            let mut slot = self.in_flight.lock();
            if slot.as_ref().is_some_and(|f| f.id == id) {
                *slot = None;
            }
        }

        CommandResult::new(status, started.elapsed())
    }

    /// Returns the final command written.
    async fn run(&self, command: &Command) -> Result<Command, TransportError> {
        let _write = self.write_lock.lock().await;
        let interrupted = self.shared.ramp_progress.lock().take();
        if let Some(step) = interrupted {
            tracing::debug!(address = %self.address(), %step, "Applying interrupted ramp");
            let next = self.state().with_command(&step);
            self.shared.replace_state(next);
        }
        let result = self.transmit(command).await;
        if result.is_err() {
            self.drop_connection().await;
        }
        result
    }

    async fn transmit(&self, command: &Command) -> Result<Command, TransportError> {
        self.ensure_connected().await?;

        let mut connected = self.shared.connected.subscribe();
        let lost = async move {
            let _ = connected.wait_for(|c| !*c).await;
        };

        tokio::select! {
            biased;
            () = lost => Err(TransportError::Disconnected),
            result = self.write_sequence(command) => result,
        }
    }

    async fn write_sequence(&self, command: &Command) -> Result<Command, TransportError> {
        let interval = self.config.transition_interval();
        let Some(ramp) = Ramp::plan(&self.state(), command, interval) else {
            self.write_once(command).await?;
            return Ok(*command);
        };

        tracing::debug!(address = %self.address(), steps = ramp.steps(), "Ramping");
        for step in 0..ramp.steps() {
            let write = ramp.step(step);
            self.write_once(&write).await?;
            *self.shared.ramp_progress.lock() = Some(write);
            tokio::time::sleep(interval).await;
        }

        let last = ramp.finish(command);
        self.write_once(&last).await?;
        self.shared.ramp_progress.lock().take();
        Ok(last)
    }

    async fn write_once(&self, command: &Command) -> Result<(), TransportError> {
        let timeout = self.config.command_timeout();
        tokio::time::timeout(timeout, self.transport.write(command))
            .await
            .map_err(|_| TransportError::Timeout(millis(timeout)))?
    }

    // ========== Connection ==========

    async fn ensure_connected(&self) -> Result<(), TransportError> {
        if self.is_connected() {
            return Ok(());
        }
        let _guard = self.connect_lock.lock().await;
        if self.is_connected() {
            return Ok(());
        }

        tracing::debug!(address = %self.address(), "Connecting");
        let timeout = self.config.connect_timeout();
        let events = tokio::time::timeout(timeout, self.transport.connect())
            .await
            .map_err(|_| {
                TransportError::ConnectionFailed(format!("timed out after {} ms", millis(timeout)))
            })??;

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.connected.send_replace(true);
        let handle = tokio::spawn(listen(Arc::clone(&self.shared), generation, events));
        if let Some(stale) = self.listener.lock().replace(handle) {
            stale.abort();
        }

        tracing::debug!(address = %self.address(), generation, "Connected");
        Ok(())
    }

    /// Marks the session disconnected and stops the listener.
    ///
    /// Returns `true` if the session was connected.
    fn mark_disconnected(&self) -> bool {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
        }
        self.shared.connected.send_replace(false)
    }

    async fn drop_connection(&self) {
        if self.mark_disconnected() {
            self.close_transport().await;
        }
    }

    async fn close_transport(&self) {
        let timeout = self.config.command_timeout();
        match tokio::time::timeout(timeout, self.transport.disconnect()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(address = %self.address(), error = %e, "Failed to close transport");
            }
            Err(_) => {
                tracing::warn!(address = %self.address(), "Timed out closing transport");
            }
        }
    }

    /// Closes the session.
    ///
    /// Cancels the in-flight command, stops the notification listener and
    /// closes the transport. Idempotent; close errors are logged.
    pub async fn disconnect(&self) {
        let in_flight = self.in_flight.lock().take();
        if let Some(in_flight) = in_flight {
            let _ = in_flight.cancel.send(());
        }

        if self.mark_disconnected() {
            tracing::debug!(address = %self.address(), "Disconnecting");
            self.close_transport().await;
        }
    }
}

impl<T: Transport> Drop for DeviceSession<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.get_mut().take() {
            handle.abort();
        }
    }
}

impl<T: Transport> std::fmt::Debug for DeviceSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("address", self.address())
            .field("model", &self.advertisement.model())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// Applies unsolicited device events until the link drops.
async fn listen(
    shared: Arc<Shared>,
    generation: u64,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
) {
    while let Some(event) = events.recv().await {
        if !shared.is_current(generation) {
            return;
        }
        match event {
            TransportEvent::State(state) => {
                shared.ramp_progress.lock().take();
                shared.replace_state(state);
            }
            TransportEvent::Disconnected => break,
        }
    }

    if shared.is_current(generation) {
        tracing::debug!(address = %shared.address, generation, "Device dropped the connection");
        shared.connected.send_replace(false);
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
