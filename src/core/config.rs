mod parsing;
mod settings;
mod types;

pub use types::{
    AdminSettings, ConfigError, DatabaseSettings, Environment, RuntimeSettings, Settings,
    TelemetrySettings,
};
