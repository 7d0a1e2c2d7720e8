//! Persistence port for occupancy logs, device states and settings.
//!
//! Handlers and services only see [`StateStore`]. The server runs on
//! [`PgStore`]; tests use the in-memory store.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::{
    DeviceState, DeviceUpdate, NewDeviceState, NewSystemSetting, OccupancyLog, SystemSetting,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(#[from] diesel::r2d2::PoolError),
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("{0} already exists")]
    Conflict(String),
}

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Appends an occupancy log entry
    async fn log_occupancy(
        &self,
        count: i32,
        at: NaiveDateTime,
    ) -> Result<OccupancyLog, StoreError>;

    /// Most recent entries first
    async fn occupancy_history(&self, limit: i64) -> Result<Vec<OccupancyLog>, StoreError>;

    /// Entries strictly newer than `since`, oldest first
    async fn occupancy_since(&self, since: NaiveDateTime)
    -> Result<Vec<OccupancyLog>, StoreError>;

    /// All devices ordered by name
    async fn list_devices(&self) -> Result<Vec<DeviceState>, StoreError>;

    async fn get_device(&self, name: &str) -> Result<Option<DeviceState>, StoreError>;

    /// Applies `update` and returns the new row, or `None` if no device has that name
    async fn update_device(
        &self,
        name: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceState>, StoreError>;

    /// Like [`update_device`](Self::update_device), but only while the device is in
    /// auto mode; `None` if it is missing or has been switched to manual
    async fn update_auto_device(
        &self,
        name: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceState>, StoreError>;

    async fn create_device(&self, device: NewDeviceState) -> Result<DeviceState, StoreError>;

    async fn list_settings(&self) -> Result<Vec<SystemSetting>, StoreError>;

    async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>, StoreError>;

    /// Replaces the value of an existing setting, `None` if the key is unknown
    async fn update_setting(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<SystemSetting>, StoreError>;

    async fn create_setting(&self, setting: NewSystemSetting)
    -> Result<SystemSetting, StoreError>;
}
