//! Reporter - simulated occupancy client for the smart room backend
//!
//! Stands in for the browser's webcam detector: picks a random person count
//! on every tick and posts it to `/api/occupancy` whenever it changes.
//!
//! Environment variables:
//!   SMART_ROOM_URL     - backend base URL (default http://localhost:8080)
//!   REPORT_INTERVAL_MS - tick interval in milliseconds (default 2000)
//!   REPORT_MAX_COUNT   - highest simulated count (default 3)

use rand::Rng;
use std::time::Duration;

use smart_room::{api::occupancy::OccupancyResponse, config::ReporterConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match ReporterConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let client = reqwest::Client::new();
    let url = config.occupancy_url();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms));
    let mut last_reported: Option<u32> = None;

    log::info!("Reporting occupancy to {} every {}ms", url, config.interval_ms);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping reporter");
                break;
            }
            _ = ticker.tick() => {}
        }

        let count = rand::rng().random_range(0..=config.max_count);
        if last_reported == Some(count) {
            continue;
        }

        match report(&client, &url, count).await {
            Ok(resp) => {
                last_reported = Some(count);
                match resp.new_light_state {
                    Some(is_on) => log::info!(
                        "count={} -> light turned {}",
                        count,
                        if is_on { "on" } else { "off" }
                    ),
                    None => log::info!("count={} -> {}", count, resp.message),
                }
            }
            Err(e) => log::warn!("Failed to report count {}: {}", count, e),
        }
    }
}

async fn report(
    client: &reqwest::Client,
    url: &str,
    count: u32,
) -> Result<OccupancyResponse, reqwest::Error> {
    client
        .post(url)
        .json(&serde_json::json!({ "count": count }))
        .send()
        .await?
        .error_for_status()?
        .json::<OccupancyResponse>()
        .await
}
