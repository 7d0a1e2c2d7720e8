use crate::{
    models::{DeviceMode, DeviceState, DeviceUpdate},
    store::{StateStore, StoreError},
};
use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Device driven by occupancy
pub const MAIN_LIGHT: &str = "Main Light";

/// Setting holding the idle timeout, in seconds
pub const TIMEOUT_SETTING_KEY: &str = "timeout_seconds";

pub const DEFAULT_TIMEOUT_SECONDS: u32 = 300;

/// What the automation rule wants done to a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decision {
    /// New on/off state, if it should change
    pub set_light: Option<bool>,
    /// Motion time to remember for the next idle check
    pub motion_at: Option<NaiveDateTime>,
}

/// Result of handling one occupancy report or sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutomationOutcome {
    pub triggered: bool,
    pub new_light_state: Option<bool>,
}

/// Applies the occupancy rule to a single device.
///
/// Devices not in auto mode are never touched. A positive count records
/// motion and turns the device on. A zero count turns it off once the idle
/// time is strictly greater than `timeout`. Idle time runs from the last
/// motion, or from `last_updated` if the device changed state after that
/// (a light switched on by hand gets the full timeout).
pub fn evaluate(
    device: &DeviceState,
    count: i32,
    timeout: Duration,
    now: NaiveDateTime,
) -> Decision {
    if device.mode() != DeviceMode::Auto {
        return Decision::default();
    }

    if count > 0 {
        return Decision {
            set_light: (!device.is_on).then_some(true),
            motion_at: Some(now),
        };
    }

    let idle_since = match device.last_motion_at {
        Some(motion) => motion.max(device.last_updated),
        None => device.last_updated,
    };
    if device.is_on && now - idle_since > timeout {
        return Decision {
            set_light: Some(false),
            motion_at: None,
        };
    }

    Decision::default()
}

/// Parses a stored timeout value; rejects negatives and non-integers
pub fn parse_timeout_seconds(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

/// Runs the occupancy rule against the store
pub struct AutomationService {
    store: Arc<dyn StateStore>,
    // held across read-decide-write so reports and sweeps never interleave
    evaluation: Mutex<()>,
}

impl AutomationService {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            evaluation: Mutex::new(()),
        }
    }

    /// Logs an occupancy report and applies the rule to the main light
    pub async fn report_occupancy(
        &self,
        count: i32,
        now: NaiveDateTime,
    ) -> Result<AutomationOutcome, StoreError> {
        let _guard = self.evaluation.lock().await;
        self.store.log_occupancy(count, now).await?;
        self.apply(count, now).await
    }

    /// Applies the idle half of the rule without logging a report
    pub async fn sweep_idle(&self, now: NaiveDateTime) -> Result<AutomationOutcome, StoreError> {
        let _guard = self.evaluation.lock().await;
        self.apply(0, now).await
    }

    /// Configured idle timeout, falling back to the default when unset or invalid
    pub async fn timeout(&self) -> Result<Duration, StoreError> {
        let seconds = match self.store.get_setting(TIMEOUT_SETTING_KEY).await? {
            Some(setting) => parse_timeout_seconds(&setting.value).unwrap_or_else(|| {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_SETTING_KEY, setting.value, DEFAULT_TIMEOUT_SECONDS
                );
                DEFAULT_TIMEOUT_SECONDS
            }),
            None => DEFAULT_TIMEOUT_SECONDS,
        };
        Ok(Duration::seconds(i64::from(seconds)))
    }

    /// User-driven device change, serialised with automation runs
    pub async fn set_device(
        &self,
        name: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceState>, StoreError> {
        let _guard = self.evaluation.lock().await;
        self.store.update_device(name, update).await
    }

    async fn apply(&self, count: i32, now: NaiveDateTime) -> Result<AutomationOutcome, StoreError> {
        let device = match self.store.get_device(MAIN_LIGHT).await? {
            Some(d) => d,
            None => {
                debug!("No '{}' device, skipping automation", MAIN_LIGHT);
                return Ok(AutomationOutcome::default());
            }
        };

        let timeout = self.timeout().await?;
        let decision = evaluate(&device, count, timeout, now);

        let update = match (decision.set_light, decision.motion_at) {
            (Some(is_on), Some(at)) => DeviceUpdate::power(is_on, now).with_motion(at),
            (Some(is_on), None) => DeviceUpdate::power(is_on, now),
            (None, Some(at)) => DeviceUpdate::motion(at),
            (None, None) => return Ok(AutomationOutcome::default()),
        };

        // conditional on auto mode: a manual switch after the read wins
        if self
            .store
            .update_auto_device(MAIN_LIGHT, update)
            .await?
            .is_none()
        {
            debug!("'{}' left auto mode, decision dropped", MAIN_LIGHT);
            return Ok(AutomationOutcome::default());
        }

        let Some(is_on) = decision.set_light else {
            return Ok(AutomationOutcome::default());
        };
        info!(
            "Automation turned '{}' {} (occupancy {})",
            MAIN_LIGHT,
            if is_on { "on" } else { "off" },
            count
        );

        Ok(AutomationOutcome {
            triggered: true,
            new_light_state: Some(is_on),
        })
    }
}
