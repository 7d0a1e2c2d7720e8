use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Utc;
use std::sync::Arc;

use smart_room::{
    api,
    config::AppConfig,
    db,
    services::{automation_engine::AutomationService, scheduler, seed},
    store::{PgStore, StateStore},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn StateStore> = match db::init_pool(&config.database_url) {
        Ok(pool) => Arc::new(PgStore::new(pool)),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if config.seed_demo_data {
        if let Err(e) = seed::seed_demo_data(store.as_ref(), Utc::now().naive_utc()).await {
            log::error!("Failed to seed demo data: {}", e);
        }
    }

    let automation = Arc::new(AutomationService::new(store.clone()));

    // Kept alive for the lifetime of the server
    let _sweeper = match &config.sweep_cron {
        Some(cron) => match scheduler::start_idle_sweeper(automation.clone(), cron).await {
            Ok(sched) => Some(sched),
            Err(e) => {
                log::error!("Failed to start idle sweeper ({}): {}", cron, e);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("Idle sweeper disabled");
            None
        }
    };

    log::info!(
        "Starting Smart Room Backend at http://{}:{}",
        config.bind_addr,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::from(automation.clone()))
            .configure(api::config)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
