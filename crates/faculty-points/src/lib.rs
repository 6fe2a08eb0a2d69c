pub mod config;
pub mod error;
pub mod import;
pub mod points;
pub mod telemetry;
