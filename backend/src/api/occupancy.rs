use crate::{
    error::ApiError,
    services::{analytics::occupancy_analytics, automation_engine::AutomationService},
    store::StateStore,
};
use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_LIMIT: i64 = 100;
pub const MAX_HISTORY_LIMIT: i64 = 500;

#[derive(Deserialize)]
pub struct OccupancyReport {
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyResponse {
    pub message: String,
    pub automation_triggered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_light_state: Option<bool>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Record a person count and run the lighting automation
#[post("")]
pub async fn log_occupancy(
    automation: web::Data<AutomationService>,
    body: web::Json<OccupancyReport>,
) -> Result<HttpResponse, ApiError> {
    let count = i32::try_from(body.count)
        .ok()
        .filter(|c| *c >= 0)
        .ok_or_else(|| ApiError::Validation("count must be a non-negative integer".to_string()))?;

    let outcome = automation
        .report_occupancy(count, Utc::now().naive_utc())
        .await?;

    Ok(HttpResponse::Ok().json(OccupancyResponse {
        message: "Occupancy logged".to_string(),
        automation_triggered: outcome.triggered,
        new_light_state: outcome.new_light_state,
    }))
}

/// Most recent occupancy reports
#[get("/history")]
pub async fn history(
    store: web::Data<dyn StateStore>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let logs = store.occupancy_history(limit).await?;
    Ok(HttpResponse::Ok().json(logs))
}

/// Hourly average and peak occupancy over the last day
#[get("/analytics")]
pub async fn analytics(store: web::Data<dyn StateStore>) -> Result<HttpResponse, ApiError> {
    let hours = occupancy_analytics(store.get_ref(), Utc::now().naive_utc()).await?;
    Ok(HttpResponse::Ok().json(hours))
}
