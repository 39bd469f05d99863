//! Configuration
//!
//! Loads layered configuration: environment variables (`DOCGATE_*`) over a
//! TOML file over built-in defaults.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::{AppConfig, LogFormat, LoggingConfig, RolesConfig, SweepConfig};
