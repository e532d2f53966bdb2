// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for entry setup, entities and the transition services.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use snooz_lib::advertisement::{MANUFACTURER_ID, parse_advertisement};
use snooz_lib::entity::{EntityState, Feature, HvacMode};
use snooz_lib::event::DeviceEvent;
use snooz_lib::manager::{ConfiguredDevice, DeviceManager, EntryData, TransitionOff, TransitionOn};
use snooz_lib::testing::{MockTransport, TEST_TOKEN, advertisement};
use snooz_lib::types::{DeviceAddress, DeviceModel, Percentage, TargetTemperature};
use snooz_lib::{Error, SessionConfig};

const ADDRESS: &str = "AA:BB:CC:DD:EE:FF";

fn pct(value: u8) -> Percentage {
    Percentage::new(value).unwrap()
}

fn address() -> DeviceAddress {
    DeviceAddress::new(ADDRESS).unwrap()
}

async fn setup(model: DeviceModel) -> (MockTransport, ConfiguredDevice<MockTransport>) {
    let mock = MockTransport::new(address());
    let entry = EntryData::new(address(), &advertisement(model));
    let device = ConfiguredDevice::setup(mock.clone(), &entry, "Bedroom", SessionConfig::default())
        .await
        .unwrap();
    (mock, device)
}

// ============================================================================
// Setup
// ============================================================================

mod entry_setup {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn unresponsive_device_fails_setup() {
        let mock = MockTransport::new(address());
        mock.set_unresponsive(true);
        let entry = EntryData::new(address(), &advertisement(DeviceModel::Original));

        let err = ConfiguredDevice::setup(mock.clone(), &entry, "Nursery", SessionConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Setup(_)));
        assert!(!mock.is_connected());
        assert_eq!(mock.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn legacy_entry_is_migrated_from_advertisement() {
        let mut payload = vec![0x0D];
        payload.extend_from_slice(TEST_TOKEN.as_bytes());
        let data = HashMap::from([(MANUFACTURER_ID, payload)]);
        let adv = parse_advertisement("Breez-1234", &data);

        let json = format!(r#"{{"address":"{ADDRESS}","token":"{TEST_TOKEN}"}}"#);
        let mut entry: EntryData = serde_json::from_str(&json).unwrap();
        assert!(entry.migrate(adv.as_ref()).unwrap());

        let device = ConfiguredDevice::setup(
            MockTransport::new(address()),
            &entry,
            "Bedroom",
            SessionConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(device.info().model(), DeviceModel::Breez);
        assert!(device.features().contains(&Feature::Airflow));
    }

    #[test]
    fn legacy_entry_without_advertisement() {
        let mut entry = EntryData::legacy(address(), TEST_TOKEN);
        assert!(matches!(entry.migrate(None), Err(Error::Migration(_))));
    }
}

// ============================================================================
// Entities
// ============================================================================

mod entities {
    use super::*;

    fn entity(
        device: &ConfiguredDevice<MockTransport>,
        feature: Feature,
    ) -> snooz_lib::FeatureEntity<MockTransport> {
        device
            .entities()
            .into_iter()
            .find(|e| e.feature() == feature)
            .unwrap()
    }

    #[tokio::test]
    async fn unique_ids_follow_address() {
        let (_mock, device) = setup(DeviceModel::Breez).await;
        let ids: Vec<_> = device.entities().iter().map(|e| e.unique_id()).collect();

        assert_eq!(
            ids,
            vec![
                ADDRESS.to_string(),
                format!("{ADDRESS}-airflow"),
                format!("{ADDRESS}-light"),
                format!("{ADDRESS}-night-mode"),
                format!("{ADDRESS}-auto-airflow"),
            ]
        );
    }

    #[tokio::test]
    async fn climate_mode_round_trip() {
        let (mock, device) = setup(DeviceModel::Breez).await;
        let climate = entity(&device, Feature::Climate);

        climate.set_hvac_mode(HvacMode::FanOnly).await.unwrap();
        climate
            .set_temperature(TargetTemperature::new(72).unwrap())
            .await
            .unwrap();
        assert_eq!(climate.current().hvac_mode(), Some(HvacMode::FanOnly));
        assert_eq!(
            climate.current().target_temperature(),
            Some(TargetTemperature::new(72).unwrap())
        );

        climate.set_hvac_mode(HvacMode::Off).await.unwrap();
        assert_eq!(climate.current().hvac_mode(), Some(HvacMode::Off));
        assert_eq!(mock.device_state().fan_on(), Some(false));
    }

    #[tokio::test]
    async fn entities_share_one_session() {
        let (mock, device) = setup(DeviceModel::Breez).await;
        let sound = entity(&device, Feature::Sound);
        let airflow = entity(&device, Feature::Airflow);

        sound.turn_on(Some(pct(30)), None).await.unwrap();
        airflow.set_percentage(pct(60)).await.unwrap();

        assert!(Arc::ptr_eq(sound.session(), airflow.session()));
        assert_eq!(mock.connect_count(), 1);
        assert_eq!(sound.current().percentage(), Some(pct(30)));
        assert_eq!(airflow.current().percentage(), Some(pct(60)));
    }

    #[tokio::test]
    async fn restored_state_shows_until_connected() {
        let (_mock, device) = setup(DeviceModel::Original).await;
        device.unload().await;
        let light = entity(&device, Feature::Light);
        light.restore(EntityState::new().with_is_on(true).with_brightness(64));

        assert!(light.assumed_state());
        assert_eq!(light.current().brightness(), Some(64));

        light.turn_off(None).await.unwrap();
        assert!(!light.assumed_state());
        assert_eq!(light.current().is_on(), Some(false));
    }
}

// ============================================================================
// Services
// ============================================================================

mod services {
    use super::*;

    async fn manager_with(model: DeviceModel) -> (MockTransport, DeviceManager<MockTransport>) {
        let (mock, device) = setup(model).await;
        let manager = DeviceManager::new();
        manager.add_device("bedroom", device).await;
        (mock, manager)
    }

    #[tokio::test(start_paused = true)]
    async fn transition_on_without_levels_turns_sound_on() {
        let (mock, manager) = manager_with(DeviceModel::Original).await;

        let results = manager
            .transition_on(&TransitionOn::new(["bedroom"]))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].1.is_successful());
        let state = mock.device_state();
        assert_eq!(state.on(), Some(true));
        assert!(state.fan_on().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn transition_on_with_levels_ramps() {
        let (mock, manager) = manager_with(DeviceModel::Breez).await;

        let request = TransitionOn::new(["bedroom"])
            .with_volume(pct(50))
            .with_fan_speed(pct(30));
        let started = tokio::time::Instant::now();
        let results = manager.transition_on(&request).await.unwrap();

        assert!(results[0].1.is_successful());
        assert!(started.elapsed() >= Duration::from_secs(20));
        let state = mock.device_state();
        assert_eq!(state.volume(), Some(pct(50)));
        assert_eq!(state.fan_speed(), Some(pct(30)));
        assert_eq!(state.fan_on(), Some(true));
        assert!(mock.write_count() > 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transition_off_fan_only_leaves_sound() {
        let (mock, manager) = manager_with(DeviceModel::Breez).await;
        manager
            .transition_on(&TransitionOn::new(["bedroom"]))
            .await
            .unwrap();

        manager
            .transition_off(&TransitionOff::new(["bedroom"]).only_fan())
            .await
            .unwrap();

        let state = mock.device_state();
        assert_eq!(state.on(), Some(true));
        assert_eq!(state.fan_on(), Some(false));
    }

    #[tokio::test]
    async fn unknown_device_is_reported() {
        let (_mock, manager) = manager_with(DeviceModel::Original).await;

        let err = manager
            .transition_on(&TransitionOn::new(["elsewhere"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound(id) if id == "elsewhere"));
    }

    #[tokio::test]
    async fn removing_device_publishes_event() {
        let (mock, manager) = manager_with(DeviceModel::Original).await;
        let mut events = manager.subscribe();

        assert!(manager.remove_device("bedroom").await);

        assert_eq!(
            events.recv().await.unwrap(),
            DeviceEvent::device_removed("bedroom")
        );
        assert_eq!(manager.device_count().await, 0);
        assert!(!mock.is_connected());
    }
}
