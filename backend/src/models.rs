use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{device_states, occupancy_logs, system_settings};

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = occupancy_logs)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyLog {
    pub id: i32,
    pub occupancy_count: i32,
    pub timestamp: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = occupancy_logs)]
pub struct NewOccupancyLog {
    pub occupancy_count: i32,
    pub timestamp: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = device_states)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    pub id: i32,
    pub name: String,
    pub is_on: bool,
    pub mode: String,
    pub last_updated: NaiveDateTime,
    /// Last time occupancy was seen while this device was automated
    pub last_motion_at: Option<NaiveDateTime>,
}

impl DeviceState {
    /// Parsed mode; unknown values are treated as manual so automation never touches them
    pub fn mode(&self) -> DeviceMode {
        DeviceMode::parse(&self.mode).unwrap_or(DeviceMode::Manual)
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = device_states)]
pub struct NewDeviceState {
    pub name: String,
    pub is_on: bool,
    pub mode: String,
    pub last_updated: NaiveDateTime,
}

/// Partial device update. `None` fields are left untouched.
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = device_states)]
pub struct DeviceUpdate {
    pub is_on: Option<bool>,
    pub mode: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
    pub last_motion_at: Option<Option<NaiveDateTime>>,
}

impl DeviceUpdate {
    /// On/off and mode change; refreshes `last_updated`
    pub fn new(is_on: Option<bool>, mode: Option<DeviceMode>, at: NaiveDateTime) -> Self {
        Self {
            is_on,
            mode: mode.map(|m| m.as_str().to_string()),
            last_updated: Some(at),
            last_motion_at: None,
        }
    }

    pub fn power(is_on: bool, at: NaiveDateTime) -> Self {
        Self::new(Some(is_on), None, at)
    }

    /// Motion bookkeeping only, `last_updated` is left alone
    pub fn motion(at: NaiveDateTime) -> Self {
        Self {
            is_on: None,
            mode: None,
            last_updated: None,
            last_motion_at: Some(Some(at)),
        }
    }

    pub fn with_motion(mut self, at: NaiveDateTime) -> Self {
        self.last_motion_at = Some(Some(at));
        self
    }

    #[cfg(test)]
    pub(crate) fn apply_to(&self, device: &mut DeviceState) {
        if let Some(is_on) = self.is_on {
            device.is_on = is_on;
        }
        if let Some(mode) = &self.mode {
            device.mode = mode.clone();
        }
        if let Some(at) = self.last_updated {
            device.last_updated = at;
        }
        if let Some(motion) = self.last_motion_at {
            device.last_motion_at = motion;
        }
    }
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = system_settings)]
pub struct SystemSetting {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = system_settings)]
pub struct NewSystemSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

/// Who drives a device's on/off state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceMode {
    Auto,
    Manual,
}

impl DeviceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceMode::Auto => "auto",
            DeviceMode::Manual => "manual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(DeviceMode::Auto),
            "manual" => Some(DeviceMode::Manual),
            _ => None,
        }
    }
}
