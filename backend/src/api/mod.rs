use crate::error::{json_error_handler, query_error_handler};
use actix_web::{HttpResponse, Responder, get, web};

pub mod devices;
pub mod occupancy;
pub mod settings;

#[get("/")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "Smart Room Backend",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));

    cfg.service(health_check);

    // Occupancy reports, history and analytics
    cfg.service(
        web::scope("/api/occupancy")
            .service(occupancy::log_occupancy)
            .service(occupancy::history)
            .service(occupancy::analytics),
    );

    // Device state
    cfg.service(
        web::scope("/api/devices")
            .service(devices::list_devices)
            .service(devices::toggle_device),
    );

    // System settings
    cfg.service(
        web::scope("/api/settings")
            .service(settings::list_settings)
            .service(settings::update_setting),
    );
}
