pub mod bootstrap;
pub mod config;
pub mod metrics;
pub mod security;
pub mod telemetry;
pub mod time;
