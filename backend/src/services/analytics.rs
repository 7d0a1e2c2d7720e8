use crate::{
    models::OccupancyLog,
    store::{StateStore, StoreError},
};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Window covered by the analytics endpoint
pub const ANALYTICS_WINDOW_HOURS: i64 = 24;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HourlyOccupancy {
    /// Hour of day, e.g. "14:00"
    pub hour: String,
    pub average_occupancy: f64,
    pub peak_occupancy: i32,
}

/// Groups logs by hour of day. Averages are rounded to one decimal and
/// hours are returned latest label first.
pub fn hourly_occupancy(logs: &[OccupancyLog]) -> Vec<HourlyOccupancy> {
    let mut buckets: BTreeMap<String, (i64, i64, i32)> = BTreeMap::new();

    for log in logs {
        let (sum, n, peak) = buckets
            .entry(log.timestamp.format("%H:00").to_string())
            .or_insert((0, 0, 0));
        *sum += i64::from(log.occupancy_count);
        *n += 1;
        *peak = (*peak).max(log.occupancy_count);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(hour, (sum, n, peak))| HourlyOccupancy {
            hour,
            average_occupancy: (sum as f64 / n as f64 * 10.0).round() / 10.0,
            peak_occupancy: peak,
        })
        .collect()
}

/// Hourly breakdown of the last 24 hours of reports
pub async fn occupancy_analytics(
    store: &dyn StateStore,
    now: NaiveDateTime,
) -> Result<Vec<HourlyOccupancy>, StoreError> {
    let since = now - Duration::hours(ANALYTICS_WINDOW_HOURS);
    let logs = store.occupancy_since(since).await?;
    Ok(hourly_occupancy(&logs))
}
