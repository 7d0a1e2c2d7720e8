use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use super::{StateStore, StoreError};
use crate::models::{
    DeviceMode, DeviceState, DeviceUpdate, NewDeviceState, NewSystemSetting, OccupancyLog, SystemSetting,
};

#[derive(Default)]
struct Tables {
    occupancy_logs: Vec<OccupancyLog>,
    devices: Vec<DeviceState>,
    settings: Vec<SystemSetting>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store backing the service and handler tests
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn log_occupancy(
        &self,
        count: i32,
        at: NaiveDateTime,
    ) -> Result<OccupancyLog, StoreError> {
        let mut tables = self.tables.lock().await;
        let entry = OccupancyLog {
            id: tables.next_id(),
            occupancy_count: count,
            timestamp: at,
        };
        tables.occupancy_logs.push(entry.clone());
        Ok(entry)
    }

    async fn occupancy_history(&self, limit: i64) -> Result<Vec<OccupancyLog>, StoreError> {
        let tables = self.tables.lock().await;
        let mut logs = tables.occupancy_logs.clone();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        logs.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(logs)
    }

    async fn occupancy_since(
        &self,
        since: NaiveDateTime,
    ) -> Result<Vec<OccupancyLog>, StoreError> {
        let tables = self.tables.lock().await;
        let mut logs: Vec<OccupancyLog> = tables
            .occupancy_logs
            .iter()
            .filter(|l| l.timestamp > since)
            .cloned()
            .collect();
        logs.sort_by_key(|l| l.timestamp);
        Ok(logs)
    }

    async fn list_devices(&self) -> Result<Vec<DeviceState>, StoreError> {
        let tables = self.tables.lock().await;
        let mut devices = tables.devices.clone();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(devices)
    }

    async fn get_device(&self, name: &str) -> Result<Option<DeviceState>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.devices.iter().find(|d| d.name == name).cloned())
    }

    async fn update_device(
        &self,
        name: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceState>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(device) = tables.devices.iter_mut().find(|d| d.name == name) else {
            return Ok(None);
        };
        update.apply_to(device);
        Ok(Some(device.clone()))
    }

    async fn update_auto_device(
        &self,
        name: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceState>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(device) = tables
            .devices
            .iter_mut()
            .find(|d| d.name == name && d.mode == DeviceMode::Auto.as_str())
        else {
            return Ok(None);
        };
        update.apply_to(device);
        Ok(Some(device.clone()))
    }

    async fn create_device(&self, device: NewDeviceState) -> Result<DeviceState, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.devices.iter().any(|d| d.name == device.name) {
            return Err(StoreError::Conflict(format!("device '{}'", device.name)));
        }
        let created = DeviceState {
            id: tables.next_id(),
            name: device.name,
            is_on: device.is_on,
            mode: device.mode,
            last_updated: device.last_updated,
            last_motion_at: None,
        };
        tables.devices.push(created.clone());
        Ok(created)
    }

    async fn list_settings(&self) -> Result<Vec<SystemSetting>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.settings.clone())
    }

    async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.settings.iter().find(|s| s.key == key).cloned())
    }

    async fn update_setting(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<SystemSetting>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(setting) = tables.settings.iter_mut().find(|s| s.key == key) else {
            return Ok(None);
        };
        setting.value = value.to_string();
        Ok(Some(setting.clone()))
    }

    async fn create_setting(
        &self,
        setting: NewSystemSetting,
    ) -> Result<SystemSetting, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.settings.iter().any(|s| s.key == setting.key) {
            return Err(StoreError::Conflict(format!("setting '{}'", setting.key)));
        }
        let created = SystemSetting {
            id: tables.next_id(),
            key: setting.key,
            value: setting.value,
            description: setting.description,
        };
        tables.settings.push(created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn light(name: &str) -> NewDeviceState {
        NewDeviceState {
            name: name.to_string(),
            is_on: false,
            mode: "auto".to_string(),
            last_updated: at(8, 0, 0),
        }
    }

    #[tokio::test]
    async fn test_history_newest_first_with_limit() {
        let store = MemoryStore::new();
        store.log_occupancy(1, at(8, 0, 0)).await.unwrap();
        store.log_occupancy(2, at(8, 0, 2)).await.unwrap();
        store.log_occupancy(0, at(8, 0, 1)).await.unwrap();

        let history = store.occupancy_history(2).await.unwrap();
        let counts: Vec<i32> = history.iter().map(|l| l.occupancy_count).collect();
        assert_eq!(counts, vec![2, 0]);
    }

    #[tokio::test]
    async fn test_occupancy_since_is_exclusive() {
        let store = MemoryStore::new();
        store.log_occupancy(1, at(8, 0, 0)).await.unwrap();
        store.log_occupancy(2, at(9, 0, 0)).await.unwrap();

        let logs = store.occupancy_since(at(8, 0, 0)).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].occupancy_count, 2);
    }

    #[tokio::test]
    async fn test_update_device_refreshes_last_updated() {
        let store = MemoryStore::new();
        store.create_device(light("Main Light")).await.unwrap();

        let updated = store
            .update_device("Main Light", DeviceUpdate::power(true, at(9, 15, 0)))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_on);
        assert_eq!(updated.mode, "auto");
        assert_eq!(updated.last_updated, at(9, 15, 0));
    }

    #[tokio::test]
    async fn test_update_unknown_device_is_none() {
        let store = MemoryStore::new();
        let result = store
            .update_device("Lamp", DeviceUpdate::power(true, at(9, 0, 0)))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_motion_update_keeps_last_updated() {
        let store = MemoryStore::new();
        store.create_device(light("Main Light")).await.unwrap();
        store
            .update_auto_device("Main Light", DeviceUpdate::motion(at(10, 0, 0)))
            .await
            .unwrap()
            .unwrap();

        let device = store.get_device("Main Light").await.unwrap().unwrap();
        assert_eq!(device.last_motion_at, Some(at(10, 0, 0)));
        assert_eq!(device.last_updated, at(8, 0, 0));
    }

    #[tokio::test]
    async fn test_auto_update_skips_manual_device() {
        let store = MemoryStore::new();
        store
            .create_device(NewDeviceState {
                mode: "manual".to_string(),
                ..light("AC Unit")
            })
            .await
            .unwrap();

        let result = store
            .update_auto_device(
                "AC Unit",
                DeviceUpdate::power(true, at(9, 0, 0)).with_motion(at(9, 0, 0)),
            )
            .await
            .unwrap();
        assert!(result.is_none());

        let device = store.get_device("AC Unit").await.unwrap().unwrap();
        assert!(!device.is_on);
        assert_eq!(device.last_motion_at, None);
        assert_eq!(device.last_updated, at(8, 0, 0));
    }

    #[tokio::test]
    async fn test_device_names_are_unique() {
        let store = MemoryStore::new();
        store.create_device(light("Main Light")).await.unwrap();
        assert!(store.create_device(light("Main Light")).await.is_err());
    }

    #[tokio::test]
    async fn test_devices_listed_by_name() {
        let store = MemoryStore::new();
        store.create_device(light("Main Light")).await.unwrap();
        store.create_device(light("AC Unit")).await.unwrap();

        let names: Vec<String> = store
            .list_devices()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["AC Unit", "Main Light"]);
    }

    #[tokio::test]
    async fn test_update_setting() {
        let store = MemoryStore::new();
        store
            .create_setting(NewSystemSetting {
                key: "timeout_seconds".to_string(),
                value: "10".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let updated = store
            .update_setting("timeout_seconds", "30")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value, "30");
        assert!(store.update_setting("missing", "1").await.unwrap().is_none());
    }
}
