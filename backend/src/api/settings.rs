use crate::{
    error::ApiError,
    services::automation_engine::{TIMEOUT_SETTING_KEY, parse_timeout_seconds},
    store::StateStore,
};
use actix_web::{HttpResponse, get, put, web};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct UpdateSettingRequest {
    pub value: String,
}

#[get("")]
pub async fn list_settings(store: web::Data<dyn StateStore>) -> Result<HttpResponse, ApiError> {
    let settings = store.list_settings().await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// Replace a setting's value. Only existing keys can be updated.
#[put("/{key}")]
pub async fn update_setting(
    store: web::Data<dyn StateStore>,
    path: web::Path<String>,
    body: web::Json<UpdateSettingRequest>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();

    if key == TIMEOUT_SETTING_KEY && parse_timeout_seconds(&body.value).is_none() {
        return Err(ApiError::Validation(format!(
            "{} must be a non-negative integer",
            TIMEOUT_SETTING_KEY
        )));
    }

    let setting = store
        .update_setting(&key, &body.value)
        .await?
        .ok_or(ApiError::NotFound("Setting"))?;

    log::info!("Setting '{}' updated to '{}'", setting.key, setting.value);
    Ok(HttpResponse::Ok().json(setting))
}
