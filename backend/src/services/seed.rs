use crate::{
    models::{DeviceMode, NewDeviceState, NewSystemSetting},
    services::automation_engine::{MAIN_LIGHT, TIMEOUT_SETTING_KEY},
    store::{StateStore, StoreError},
};
use chrono::{Duration, NaiveDateTime};
use log::info;
use rand::Rng;

/// Timeout seeded for demos, much shorter than the built-in default
pub const DEMO_TIMEOUT_SECONDS: &str = "10";

const DEMO_HISTORY_ENTRIES: i64 = 10;

const DEMO_DEVICES: [(&str, DeviceMode); 2] =
    [(MAIN_LIGHT, DeviceMode::Auto), ("AC Unit", DeviceMode::Manual)];

/// Fills in whatever part of the demo room is missing: the timeout setting,
/// each demo device, and a short history when no reports exist. Parts that
/// are already present are left alone, so a run interrupted halfway is
/// completed by the next one. Returns whether anything was written.
pub async fn seed_demo_data(store: &dyn StateStore, now: NaiveDateTime) -> Result<bool, StoreError> {
    let mut seeded = false;

    if store.get_setting(TIMEOUT_SETTING_KEY).await?.is_none() {
        info!("Seeding '{}' setting", TIMEOUT_SETTING_KEY);
        store
            .create_setting(NewSystemSetting {
                key: TIMEOUT_SETTING_KEY.to_string(),
                value: DEMO_TIMEOUT_SECONDS.to_string(),
                description: Some("Seconds of inactivity before turning lights off".to_string()),
            })
            .await?;
        seeded = true;
    }

    for (name, mode) in DEMO_DEVICES {
        if store.get_device(name).await?.is_some() {
            continue;
        }
        info!("Seeding device '{}'", name);
        store
            .create_device(NewDeviceState {
                name: name.to_string(),
                is_on: false,
                mode: mode.as_str().to_string(),
                last_updated: now,
            })
            .await?;
        seeded = true;
    }

    if store.occupancy_history(1).await?.is_empty() {
        info!("Seeding {} occupancy logs", DEMO_HISTORY_ENTRIES);
        let counts: Vec<i32> = {
            let mut rng = rand::rng();
            (0..DEMO_HISTORY_ENTRIES)
                .map(|_| rng.random_range(0..=2))
                .collect()
        };
        for (i, count) in (0..DEMO_HISTORY_ENTRIES).rev().zip(counts) {
            store
                .log_occupancy(count, now - Duration::minutes(i * 5))
                .await?;
        }
        seeded = true;
    }

    Ok(seeded)
}
