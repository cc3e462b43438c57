pub mod config;
pub mod draws;
pub mod output;
pub mod profile;
pub mod scoring;
pub mod telemetry;
