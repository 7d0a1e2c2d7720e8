use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::{StateStore, StoreError};
use crate::{
    db::{DbConnection, DbPool},
    models::{
        DeviceMode, DeviceState, DeviceUpdate, NewDeviceState, NewOccupancyLog, NewSystemSetting,
        OccupancyLog, SystemSetting,
    },
    schema::{device_states, occupancy_logs, system_settings},
};

/// Diesel-backed store over an r2d2 pool
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConnection, StoreError> {
        Ok(self.pool.get()?)
    }
}

#[async_trait]
impl StateStore for PgStore {
    async fn log_occupancy(
        &self,
        count: i32,
        at: NaiveDateTime,
    ) -> Result<OccupancyLog, StoreError> {
        let mut conn = self.conn()?;
        let entry = diesel::insert_into(occupancy_logs::table)
            .values(&NewOccupancyLog {
                occupancy_count: count,
                timestamp: at,
            })
            .returning(OccupancyLog::as_returning())
            .get_result(&mut conn)?;
        Ok(entry)
    }

    async fn occupancy_history(&self, limit: i64) -> Result<Vec<OccupancyLog>, StoreError> {
        let mut conn = self.conn()?;
        let logs = occupancy_logs::table
            .order((occupancy_logs::timestamp.desc(), occupancy_logs::id.desc()))
            .limit(limit)
            .select(OccupancyLog::as_select())
            .load(&mut conn)?;
        Ok(logs)
    }

    async fn occupancy_since(
        &self,
        since: NaiveDateTime,
    ) -> Result<Vec<OccupancyLog>, StoreError> {
        let mut conn = self.conn()?;
        let logs = occupancy_logs::table
            .filter(occupancy_logs::timestamp.gt(since))
            .order(occupancy_logs::timestamp.asc())
            .select(OccupancyLog::as_select())
            .load(&mut conn)?;
        Ok(logs)
    }

    async fn list_devices(&self) -> Result<Vec<DeviceState>, StoreError> {
        let mut conn = self.conn()?;
        let devices = device_states::table
            .order(device_states::name.asc())
            .select(DeviceState::as_select())
            .load(&mut conn)?;
        Ok(devices)
    }

    async fn get_device(&self, name: &str) -> Result<Option<DeviceState>, StoreError> {
        let mut conn = self.conn()?;
        let device = device_states::table
            .filter(device_states::name.eq(name))
            .select(DeviceState::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(device)
    }

    async fn update_device(
        &self,
        name: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceState>, StoreError> {
        let mut conn = self.conn()?;
        let updated = diesel::update(device_states::table.filter(device_states::name.eq(name)))
            .set(&update)
            .returning(DeviceState::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(updated)
    }

    async fn update_auto_device(
        &self,
        name: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceState>, StoreError> {
        let mut conn = self.conn()?;
        let updated = diesel::update(
            device_states::table
                .filter(device_states::name.eq(name))
                .filter(device_states::mode.eq(DeviceMode::Auto.as_str())),
        )
        .set(&update)
        .returning(DeviceState::as_returning())
        .get_result(&mut conn)
        .optional()?;
        Ok(updated)
    }

    async fn create_device(&self, device: NewDeviceState) -> Result<DeviceState, StoreError> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(device_states::table)
            .values(&device)
            .returning(DeviceState::as_returning())
            .get_result(&mut conn)?;
        Ok(created)
    }

    async fn list_settings(&self) -> Result<Vec<SystemSetting>, StoreError> {
        let mut conn = self.conn()?;
        let settings = system_settings::table
            .order(system_settings::id.asc())
            .select(SystemSetting::as_select())
            .load(&mut conn)?;
        Ok(settings)
    }

    async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>, StoreError> {
        let mut conn = self.conn()?;
        let setting = system_settings::table
            .filter(system_settings::key.eq(key))
            .select(SystemSetting::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(setting)
    }

    async fn update_setting(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<SystemSetting>, StoreError> {
        let mut conn = self.conn()?;
        let updated = diesel::update(system_settings::table.filter(system_settings::key.eq(key)))
            .set(system_settings::value.eq(value))
            .returning(SystemSetting::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(updated)
    }

    async fn create_setting(
        &self,
        setting: NewSystemSetting,
    ) -> Result<SystemSetting, StoreError> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(system_settings::table)
            .values(&setting)
            .returning(SystemSetting::as_returning())
            .get_result(&mut conn)?;
        Ok(created)
    }
}
