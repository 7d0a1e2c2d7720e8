//! Environment configuration for the server and the reporter.
//!
//! Values come from the process environment; binaries call
//! `dotenvy::dotenv()` first so a local `.env` file works too.

use crate::services::scheduler::DEFAULT_SWEEP_CRON;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Postgres connection string
    pub database_url: String,
    pub bind_addr: String,
    pub port: u16,
    /// Cron expression for the idle sweeper, `None` disables it
    pub sweep_cron: Option<String>,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            sweep_cron: match lookup("SWEEP_CRON") {
                Some(v) if v.trim().is_empty() => None,
                Some(v) => Some(v),
                None => Some(DEFAULT_SWEEP_CRON.to_string()),
            },
            seed_demo_data: parse_or(&lookup, "SEED_DEMO_DATA", true)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReporterConfig {
    pub base_url: String,
    pub interval_ms: u64,
    /// Highest simulated person count
    pub max_count: u32,
}

impl ReporterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: lookup("SMART_ROOM_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            interval_ms: parse_or(&lookup, "REPORT_INTERVAL_MS", 2000)?,
            max_count: parse_or(&lookup, "REPORT_MAX_COUNT", 3)?,
        })
    }

    pub fn occupancy_url(&self) -> String {
        format!("{}/api/occupancy", self.base_url.trim_end_matches('/'))
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
