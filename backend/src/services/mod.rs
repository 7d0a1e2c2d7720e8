pub mod analytics;
pub mod automation_engine;
pub mod scheduler;
pub mod seed;
