use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Store backend: "in_memory" or "redis"
    pub backend: String,
    /// Redis connection URL, required for the redis backend
    pub redis_url: Option<String>,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Maximum capacity for the in-memory backend
    pub max_capacity: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// Content TTL for the fetch cache, in seconds
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            max_capacity: Some(10_000),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self { ttl_secs: 10 }
    }
}

impl FetchSettings {
    /// Content TTL as a [`Duration`](std::time::Duration)
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("CACHETRACE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.store.backend, "in_memory");
        assert_eq!(config.fetch.ttl_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        // No config files and no CACHETRACE_* env vars in the test
        // environment, so every section falls back to its default.
        let config = AppConfig::load().unwrap();
        assert_eq!(config.fetch.ttl_secs, 10);
    }
}
