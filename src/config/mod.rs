//! Application configuration

mod app_config;

pub use app_config::{AppConfig, FetchSettings, LogFormat, LoggingConfig, StoreSettings};
