// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A feature bound to a live session.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::command::{Command, CommandResultStatus};
use crate::error::{Error, Result};
use crate::session::DeviceSession;
use crate::subscription::Subscription;
use crate::transport::Transport;
use crate::types::{Percentage, TargetTemperature, TransitionDuration};

use super::{EntityState, Feature, HvacMode, to_device_brightness};

type WriteCallback = Arc<dyn Fn(&EntityState) + Send + Sync>;

/// Host entity for one [`Feature`] of a device.
///
/// While the session is connected the entity reads live state; otherwise it
/// reports the last state seen while connected (or restored by the host)
/// and flags it as assumed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use snooz_lib::entity::{Feature, FeatureEntity};
/// use snooz_lib::session::{DeviceSession, SessionConfig};
/// use snooz_lib::testing::{MockTransport, advertisement};
/// use snooz_lib::types::{DeviceAddress, DeviceModel, Percentage};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> snooz_lib::Result<()> {
/// let session = Arc::new(DeviceSession::new(
///     MockTransport::new(DeviceAddress::new("AA:BB:CC:DD:EE:FF")?),
///     advertisement(DeviceModel::Original),
///     SessionConfig::default(),
/// ));
/// let sound = FeatureEntity::new(Arc::clone(&session), Feature::Sound);
///
/// sound.turn_on(Some(Percentage::new(40)?), None).await?;
///
/// assert!(!sound.assumed_state());
/// assert_eq!(sound.current().percentage(), Some(Percentage::new(40)?));
/// # Ok(())
/// # }
/// ```
pub struct FeatureEntity<T: Transport> {
    session: Arc<DeviceSession<T>>,
    feature: Feature,
    cache: Arc<RwLock<EntityState>>,
    on_write: Mutex<Option<WriteCallback>>,
}

impl<T: Transport> FeatureEntity<T> {
    /// Creates an entity for `feature` backed by `session`.
    #[must_use]
    pub fn new(session: Arc<DeviceSession<T>>, feature: Feature) -> Self {
        Self {
            session,
            feature,
            cache: Arc::new(RwLock::new(EntityState::new())),
            on_write: Mutex::new(None),
        }
    }

    /// Returns the feature this entity exposes.
    #[must_use]
    pub fn feature(&self) -> Feature {
        self.feature
    }

    /// Returns the entity's unique id.
    #[must_use]
    pub fn unique_id(&self) -> String {
        self.feature.unique_id(self.session.address())
    }

    /// Returns the session behind this entity.
    #[must_use]
    pub fn session(&self) -> &Arc<DeviceSession<T>> {
        &self.session
    }

    /// Returns `true` when the device cannot be reached and the reported
    /// state is the cached one.
    #[must_use]
    pub fn assumed_state(&self) -> bool {
        !self.session.is_connected()
    }

    /// Returns the state to show the host.
    #[must_use]
    pub fn current(&self) -> EntityState {
        if self.assumed_state() {
            self.cache.read().clone()
        } else {
            self.feature.read(&self.session.state())
        }
    }

    /// Seeds the cache with a state the host persisted earlier.
    pub fn restore(&self, state: EntityState) {
        *self.cache.write() = state;
    }

    /// Subscribes to session changes.
    ///
    /// On every change the cache is refreshed (while connected) and
    /// `on_write` receives the state to show. The same callback is invoked
    /// after each successful operation. Call
    /// [`Subscription::unsubscribe`] when the host removes the entity.
    pub fn attach<F>(&self, on_write: F) -> Subscription
    where
        F: Fn(&EntityState) + Send + Sync + 'static,
    {
        let on_write: WriteCallback = Arc::new(on_write);
        *self.on_write.lock() = Some(Arc::clone(&on_write));

        let feature = self.feature;
        let cache = Arc::clone(&self.cache);
        let connection = self.session.connection_watch();
        self.session.subscribe_to_state_change(move |state| {
            let current = if *connection.borrow() {
                let live = feature.read(state);
                *cache.write() = live.clone();
                live
            } else {
                cache.read().clone()
            };
            on_write(&current);
        })
    }

    // ========== Operations ==========

    /// Turns the feature on.
    ///
    /// `percentage` is the volume or fan speed; for the light it is the
    /// device brightness (see [`turn_on_light`](Self::turn_on_light) for the
    /// host scale).
    ///
    /// # Errors
    ///
    /// Returns `Error::CommandFailed` if the device did not apply the
    /// command, or `Error::UnsupportedFeature` if the feature cannot be
    /// turned on this way.
    pub async fn turn_on(
        &self,
        percentage: Option<Percentage>,
        duration: Option<TransitionDuration>,
    ) -> Result<()> {
        let command = self.feature.turn_on_command(percentage, duration)?;
        self.execute(command).await
    }

    /// Turns the light on with a host-scale brightness (0-255).
    ///
    /// # Errors
    ///
    /// See [`turn_on`](Self::turn_on).
    pub async fn turn_on_light(&self, brightness: Option<u8>) -> Result<()> {
        if self.feature != Feature::Light {
            return Err(Error::UnsupportedFeature {
                feature: self.feature.translation_key(),
                operation: "set_brightness",
            });
        }
        self.turn_on(brightness.map(to_device_brightness), None).await
    }

    /// Turns the feature off.
    ///
    /// # Errors
    ///
    /// See [`turn_on`](Self::turn_on).
    pub async fn turn_off(&self, duration: Option<TransitionDuration>) -> Result<()> {
        let command = self.feature.turn_off_command(duration)?;
        self.execute(command).await
    }

    /// Sets the volume or fan speed. Zero turns the feature off.
    ///
    /// # Errors
    ///
    /// See [`turn_on`](Self::turn_on).
    pub async fn set_percentage(&self, percentage: Percentage) -> Result<()> {
        let command = self.feature.set_percentage_command(percentage)?;
        self.execute(command).await
    }

    /// Selects the climate HVAC mode.
    ///
    /// # Errors
    ///
    /// See [`turn_on`](Self::turn_on).
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<()> {
        let command = self.feature.hvac_mode_command(mode)?;
        self.execute(command).await
    }

    /// Sets the auto-airflow target temperature.
    ///
    /// # Errors
    ///
    /// See [`turn_on`](Self::turn_on).
    pub async fn set_temperature(&self, target: TargetTemperature) -> Result<()> {
        let command = self.feature.temperature_command(target)?;
        self.execute(command).await
    }

    async fn execute(&self, command: Command) -> Result<()> {
        let result = self.session.execute_command(command).await;
        match result.status() {
            CommandResultStatus::Successful => {
                self.write_state_changed();
                Ok(())
            }
            CommandResultStatus::Cancelled => Ok(()),
            status @ CommandResultStatus::Failed(_) => {
                tracing::warn!(
                    address = %self.session.address(),
                    feature = %self.feature,
                    %command,
                    %status,
                    duration = ?result.duration(),
                    "Entity command failed"
                );
                Err(Error::CommandFailed {
                    status,
                    duration: result.duration(),
                })
            }
        }
    }

    fn write_state_changed(&self) {
        if !self.assumed_state() {
            *self.cache.write() = self.feature.read(&self.session.state());
        }
        let on_write = self.on_write.lock().clone();
        if let Some(on_write) = on_write {
            on_write(&self.current());
        }
    }
}

impl<T: Transport> std::fmt::Debug for FeatureEntity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureEntity")
            .field("unique_id", &self.unique_id())
            .field("feature", &self.feature)
            .field("assumed_state", &self.assumed_state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandFailure;
    use crate::session::SessionConfig;
    use crate::testing::{MockTransport, advertisement};
    use crate::types::{DeviceAddress, DeviceModel};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn pct(value: u8) -> Percentage {
        Percentage::new(value).unwrap()
    }

    fn setup(feature: Feature) -> (MockTransport, FeatureEntity<MockTransport>) {
        let mock = MockTransport::new(DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap());
        let session = Arc::new(DeviceSession::new(
            mock.clone(),
            advertisement(DeviceModel::Breez),
            SessionConfig::default(),
        ));
        (mock, FeatureEntity::new(session, feature))
    }

    #[tokio::test]
    async fn disconnected_entity_reports_restored_state() {
        let (_mock, entity) = setup(Feature::Light);
        entity.restore(EntityState::new().with_is_on(true).with_brightness(128));

        assert!(entity.assumed_state());
        assert_eq!(entity.current().brightness(), Some(128));
    }

    #[tokio::test]
    async fn light_brightness_is_scaled_for_device() {
        let (mock, entity) = setup(Feature::Light);
        entity.turn_on_light(Some(255)).await.unwrap();

        assert_eq!(mock.device_state().light_brightness(), Some(pct(100)));
        assert_eq!(entity.current().brightness(), Some(255));
    }

    #[tokio::test]
    async fn cache_survives_disconnect() {
        let (mock, entity) = setup(Feature::Airflow);
        entity.turn_on(Some(pct(30)), None).await.unwrap();

        entity.session().disconnect().await;
        assert!(entity.assumed_state());
        assert_eq!(entity.current().percentage(), Some(pct(30)));
        assert_eq!(mock.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn set_percentage_zero_turns_off() {
        let (mock, entity) = setup(Feature::Sound);
        entity.turn_on(Some(pct(50)), None).await.unwrap();
        entity.set_percentage(Percentage::MIN).await.unwrap();

        assert_eq!(mock.device_state().on(), Some(false));
        assert_eq!(entity.current().is_on(), Some(false));
    }

    #[tokio::test]
    async fn failure_becomes_error() {
        let (mock, entity) = setup(Feature::NightMode);
        mock.set_fail_connect(true);

        let err = entity.turn_on(None, None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::CommandFailed {
                status: CommandResultStatus::Failed(CommandFailure::ConnectionFailed),
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_is_ok() {
        let (mock, entity) = setup(Feature::Sound);
        mock.set_write_latency(Duration::from_secs(1));
        let entity = Arc::new(entity);

        let first = {
            let entity = Arc::clone(&entity);
            tokio::spawn(async move { entity.turn_on(Some(pct(10)), None).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        entity.turn_off(None).await.unwrap();

        assert!(first.await.unwrap().is_ok());
        assert_eq!(mock.device_state().on(), Some(false));
    }

    #[tokio::test]
    async fn attach_notifies_host() {
        let (_mock, entity) = setup(Feature::NightMode);
        let writes = Arc::new(AtomicUsize::new(0));
        let writes_clone = Arc::clone(&writes);
        let sub = entity.attach(move |state| {
            assert_eq!(state.is_on(), Some(true));
            writes_clone.fetch_add(1, Ordering::SeqCst);
        });

        entity.turn_on(None, None).await.unwrap();
        // once from the session dispatch, once after the operation
        assert_eq!(writes.load(Ordering::SeqCst), 2);

        sub.unsubscribe();
    }
}
