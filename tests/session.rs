// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the device session using the mock transport.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use snooz_lib::command::{self, CommandFailure, CommandResultStatus};
use snooz_lib::state::DeviceState;
use snooz_lib::testing::{MockTransport, advertisement};
use snooz_lib::types::{DeviceAddress, DeviceModel, Percentage, TransitionDuration};
use snooz_lib::{DeviceSession, SessionConfig};

fn pct(value: u8) -> Percentage {
    Percentage::new(value).unwrap()
}

fn secs(value: u16) -> Option<TransitionDuration> {
    Some(TransitionDuration::new(value).unwrap())
}

fn session(model: DeviceModel) -> (MockTransport, Arc<DeviceSession<MockTransport>>) {
    let mock = MockTransport::new(DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap());
    let session = DeviceSession::new(mock.clone(), advertisement(model), SessionConfig::default());
    (mock, Arc::new(session))
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ramps_volume_up() {
        let (mock, session) = session(DeviceModel::Original);
        let first = session.execute_command(command::turn_on(Some(pct(40)), None)).await;
        assert!(first.is_successful());

        let result = session
            .execute_command(command::turn_on(Some(pct(75)), secs(20)))
            .await;

        assert_eq!(result.status(), CommandResultStatus::Successful);
        assert!(result.duration() >= Duration::from_secs(20));

        let writes = mock.writes();
        // initial write, 20 ramp steps, final command
        assert_eq!(writes.len(), 22);
        assert_eq!(writes[1].volume(), Some(pct(40)));
        assert!(
            writes[1..21]
                .windows(2)
                .all(|w| w[0].volume() <= w[1].volume())
        );
        assert_eq!(writes[21], command::turn_on(Some(pct(75)), secs(20)));

        let state = session.state();
        assert_eq!(state.on(), Some(true));
        assert_eq!(state.volume(), Some(pct(75)));
    }

    #[tokio::test(start_paused = true)]
    async fn new_command_preempts_ramp() {
        let (mock, session) = session(DeviceModel::Original);
        session
            .execute_command(command::turn_on(Some(pct(40)), None))
            .await;

        let ramp = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                session
                    .execute_command(command::turn_on(Some(pct(75)), secs(20)))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_secs(5)).await;

        let off = session.execute_command(command::turn_off(None)).await;
        let ramp = ramp.await.unwrap();

        assert_eq!(ramp.status(), CommandResultStatus::Cancelled);
        assert!(ramp.duration() < Duration::from_secs(6));
        assert!(off.is_successful());
        assert_eq!(session.state().on(), Some(false));
        assert_eq!(mock.device_state().on(), Some(false));
        assert_eq!(mock.last_write(), Some(command::turn_off(None)));
    }

    #[tokio::test(start_paused = true)]
    async fn fade_in_ends_at_stored_volume() {
        let (mock, session) = session(DeviceModel::Original);
        session
            .execute_command(command::turn_on(Some(pct(70)), None))
            .await;
        session.execute_command(command::turn_off(None)).await;

        let result = session
            .execute_command(command::turn_on(None, secs(10)))
            .await;

        assert!(result.is_successful());
        let device = mock.device_state();
        assert_eq!(device.on(), Some(true));
        assert_eq!(device.volume(), Some(pct(70)));
        assert_eq!(session.state().volume(), device.volume());
        assert_eq!(session.state().on(), device.on());
    }

    #[tokio::test(start_paused = true)]
    async fn fade_out_keeps_volume_for_next_power_on() {
        let (mock, session) = session(DeviceModel::Original);
        session
            .execute_command(command::turn_on(Some(pct(70)), None))
            .await;

        let result = session.execute_command(command::turn_off(secs(10))).await;

        assert!(result.is_successful());
        let device = mock.device_state();
        assert_eq!(device.on(), Some(false));
        assert_eq!(device.volume(), Some(pct(70)));
        assert_eq!(session.state().volume(), device.volume());
        // the ramp passed through low levels before powering off
        assert!(
            mock.writes()
                .iter()
                .any(|w| w.volume().is_some_and(|v| v < pct(10)))
        );

        session.execute_command(command::turn_on(None, None)).await;
        assert_eq!(mock.device_state().volume(), Some(pct(70)));
    }

    #[tokio::test(start_paused = true)]
    async fn fan_fade_out_keeps_speed() {
        let (mock, session) = session(DeviceModel::Breez);
        session
            .execute_command(command::turn_fan_on(Some(pct(60)), None))
            .await;

        let result = session
            .execute_command(command::turn_fan_off(secs(5)))
            .await;

        assert!(result.is_successful());
        let device = mock.device_state();
        assert_eq!(device.fan_on(), Some(false));
        assert_eq!(device.fan_speed(), Some(pct(60)));
        assert_eq!(session.state().fan_speed(), device.fan_speed());
        assert_eq!(session.state().fan_on(), device.fan_on());
    }

    #[tokio::test(start_paused = true)]
    async fn interrupted_ramp_is_applied_by_next_command() {
        let (mock, session) = session(DeviceModel::Original);
        session
            .execute_command(command::turn_on(Some(pct(40)), None))
            .await;

        let ramp = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                session
                    .execute_command(command::turn_on(Some(pct(80)), secs(20)))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_secs(5)).await;
        let calls = Arc::new(Mutex::new(0));
        let _sub = {
            let calls = Arc::clone(&calls);
            session.subscribe_to_state_change(move |_| *calls.lock() += 1)
        };

        let next = session
            .execute_command(command::enable_night_mode())
            .await;

        assert!(ramp.await.unwrap().is_cancelled());
        assert!(next.is_successful());
        let volume = mock.device_state().volume().unwrap();
        assert!(volume > pct(40) && volume < pct(80));
        assert_eq!(session.state().volume(), Some(volume));
        assert_eq!(session.state().night_mode_enabled(), Some(true));
        // one for the interrupted ramp, one for the command
        assert_eq!(*calls.lock(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn write_timeout_fails_and_disconnects() {
        let (mock, session) = session(DeviceModel::Pro);
        mock.set_write_latency(Duration::from_secs(30));

        let result = session.execute_command(command::turn_light_off()).await;

        assert_eq!(
            result.status(),
            CommandResultStatus::Failed(CommandFailure::Timeout)
        );
        assert!(!session.is_connected());
        assert_eq!(mock.disconnect_count(), 1);
        assert!(session.state().light_on().is_none());
    }

    #[tokio::test]
    async fn connect_failure() {
        let (mock, session) = session(DeviceModel::Original);
        mock.set_fail_connect(true);

        let result = session.execute_command(command::enable_night_mode()).await;

        assert_eq!(result.failure(), Some(CommandFailure::ConnectionFailed));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn write_failure() {
        let (mock, session) = session(DeviceModel::Original);
        mock.set_fail_writes(true);

        let result = session.execute_command(command::enable_night_mode()).await;

        assert_eq!(result.failure(), Some(CommandFailure::WriteFailed));
        assert!(session.state().night_mode_enabled().is_none());
    }
}

// ============================================================================
// Connection
// ============================================================================

mod connection {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn device_disconnect_fails_command_and_reconnects() {
        let (mock, session) = session(DeviceModel::Original);
        mock.set_write_latency(Duration::from_secs(2));

        let pending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.execute_command(command::turn_on(None, None)).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        mock.trigger_disconnect();

        let result = pending.await.unwrap();
        assert_eq!(result.failure(), Some(CommandFailure::Disconnected));
        assert!(!session.is_connected());

        mock.set_write_latency(Duration::ZERO);
        let retry = session.execute_command(command::turn_on(None, None)).await;
        assert!(retry.is_successful());
        assert_eq!(mock.connect_count(), 2);
        assert!(session.is_connected());
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let (mock, session) = session(DeviceModel::Original);
        session.execute_command(command::turn_light_off()).await;

        session.disconnect().await;
        session.disconnect().await;

        assert!(!session.is_connected());
        assert_eq!(mock.disconnect_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_cancels_in_flight_command() {
        let (mock, session) = session(DeviceModel::Original);
        mock.set_write_latency(Duration::from_secs(5));

        let pending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.execute_command(command::turn_off(None)).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        session.disconnect().await;

        assert!(pending.await.unwrap().is_cancelled());
        assert!(session.state().on().is_none());
    }

    #[tokio::test]
    async fn get_info_connects_and_caches() {
        let (mock, session) = session(DeviceModel::Breez);
        assert!(session.info().is_none());

        let info = session.get_info().await.unwrap();

        assert_eq!(info.manufacturer(), "SNOOZ, LLC");
        assert_eq!(info.display_version(), Some("2.0.5"));
        assert!(info.supports_fan());
        assert_eq!(session.info(), Some(info));
        assert_eq!(mock.connect_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn get_info_on_unresponsive_device() {
        let (mock, session) = session(DeviceModel::Original);
        mock.set_unresponsive(true);

        assert!(session.get_info().await.is_none());
        assert!(!session.is_connected());
        assert!(session.info().is_none());
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

mod subscriptions {
    use super::*;

    #[tokio::test]
    async fn handlers_run_in_subscription_order() {
        let (_mock, session) = session(DeviceModel::Original);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<_> = (1..=3)
            .map(|n| {
                let calls = Arc::clone(&calls);
                session.subscribe_to_state_change(move |_| calls.lock().push(n))
            })
            .collect();

        session.execute_command(command::turn_light_off()).await;
        assert_eq!(*calls.lock(), vec![1, 2, 3]);

        assert!(subs[1].unsubscribe());
        assert!(!subs[1].unsubscribe());
        calls.lock().clear();

        session.execute_command(command::turn_light_on(None)).await;
        assert_eq!(*calls.lock(), vec![1, 3]);
    }

    #[tokio::test]
    async fn failed_command_does_not_notify() {
        let (mock, session) = session(DeviceModel::Original);
        let calls = Arc::new(Mutex::new(0));
        let calls_clone = Arc::clone(&calls);
        let _sub = session.subscribe_to_state_change(move |_| *calls_clone.lock() += 1);

        mock.set_fail_writes(true);
        session.execute_command(command::turn_light_off()).await;

        assert_eq!(*calls.lock(), 0);
    }

    #[tokio::test]
    async fn device_notification_replaces_snapshot() {
        let (mock, session) = session(DeviceModel::Breez);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let _sub = session.subscribe_to_state_change(move |state| {
            let _ = tx.send(state.clone());
        });
        session.execute_command(command::enable_night_mode()).await;
        let _ = rx.recv().await;

        let mut pushed = DeviceState::new();
        pushed.set_fan_on(true);
        pushed.set_fan_speed(pct(20));
        pushed.set_temperature(71.5);
        assert!(mock.push_state(pushed.clone()));

        let seen = rx.recv().await.unwrap();
        assert_eq!(seen, pushed);
        assert_eq!(*session.state(), pushed);
    }

    #[tokio::test]
    async fn handler_can_unsubscribe_another() {
        let (_mock, session) = session(DeviceModel::Original);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let second = {
            let calls = Arc::clone(&calls);
            Arc::new(session.subscribe_to_state_change(move |_| calls.lock().push(2)))
        };
        let _first = {
            let calls = Arc::clone(&calls);
            let second = Arc::clone(&second);
            session.subscribe_to_state_change(move |_| {
                calls.lock().push(1);
                second.unsubscribe();
            })
        };

        session.execute_command(command::turn_light_off()).await;
        // the second handler was registered first, so it still ran
        assert_eq!(*calls.lock(), vec![2, 1]);

        calls.lock().clear();
        session.execute_command(command::turn_light_on(None)).await;
        assert_eq!(*calls.lock(), vec![1]);
    }
}
