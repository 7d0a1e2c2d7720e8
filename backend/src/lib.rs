//! Smart Room Backend Library
//!
//! This library provides the core functionality for the smart room dashboard,
//! including:
//! - Occupancy logging, history and hourly analytics
//! - Main light automation driven by occupancy with an idle timeout
//! - Device state and system settings management
//! - Postgres and in-memory state stores

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod services;
pub mod store;
