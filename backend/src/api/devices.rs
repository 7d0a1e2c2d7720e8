use crate::{
    error::ApiError,
    models::{DeviceMode, DeviceUpdate},
    services::automation_engine::AutomationService,
    store::StateStore,
};
use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ToggleDeviceRequest {
    pub is_on: bool,
    #[serde(default)]
    pub mode: Option<DeviceMode>,
}

/// List all devices ordered by name
#[get("")]
pub async fn list_devices(store: web::Data<dyn StateStore>) -> Result<HttpResponse, ApiError> {
    let devices = store.list_devices().await?;
    Ok(HttpResponse::Ok().json(devices))
}

/// Set a device on/off, optionally switching its mode
#[post("/{name}/toggle")]
pub async fn toggle_device(
    automation: web::Data<AutomationService>,
    path: web::Path<String>,
    body: web::Json<ToggleDeviceRequest>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let update = DeviceUpdate::new(Some(body.is_on), body.mode, Utc::now().naive_utc());

    let device = automation
        .set_device(&name, update)
        .await?
        .ok_or(ApiError::NotFound("Device"))?;

    log::info!(
        "Device '{}' set {} ({})",
        device.name,
        if device.is_on { "on" } else { "off" },
        device.mode
    );

    Ok(HttpResponse::Ok().json(device))
}
