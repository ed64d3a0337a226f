pub mod config;
pub mod error;
pub mod scrapers;
pub mod telemetry;
