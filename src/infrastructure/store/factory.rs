//! Store factory for runtime backend selection

use std::sync::Arc;

use crate::domain::store::KeyStore;
use crate::domain::DomainError;

use super::in_memory::{InMemoryStore, InMemoryStoreConfig};
use super::redis::{RedisStore, RedisStoreConfig};

/// Supported store backends
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StoreType {
    /// In-memory store using moka
    #[default]
    InMemory,
    /// Redis store
    Redis,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::InMemory => write!(f, "in_memory"),
            StoreType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(StoreType::InMemory),
            "redis" => Ok(StoreType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown store type: {}. Valid types: in_memory, redis",
                s
            ))),
        }
    }
}

/// Configuration for the store factory
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Type of store to create
    pub store_type: StoreType,
    /// Redis URL (required for Redis type)
    pub redis_url: Option<String>,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Maximum capacity (for in-memory store)
    pub max_capacity: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::InMemory,
            redis_url: None,
            key_prefix: None,
            max_capacity: Some(10_000),
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration for the in-memory store
    pub fn in_memory() -> Self {
        Self {
            store_type: StoreType::InMemory,
            ..Default::default()
        }
    }

    /// Creates a new configuration for the redis store
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            store_type: StoreType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the maximum capacity for the in-memory store
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Builds a store configuration from the application settings
    pub fn from_settings(settings: &crate::config::StoreSettings) -> Result<Self, DomainError> {
        Ok(Self {
            store_type: settings.backend.parse()?,
            redis_url: settings.redis_url.clone(),
            key_prefix: settings.key_prefix.clone(),
            max_capacity: settings.max_capacity,
        })
    }
}

/// Creates [`KeyStore`] instances from configuration
pub struct StoreFactory;

impl StoreFactory {
    /// Creates a store according to the given configuration
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn KeyStore>, DomainError> {
        match config.store_type {
            StoreType::InMemory => {
                let mut store_config = InMemoryStoreConfig::default();

                if let Some(capacity) = config.max_capacity {
                    store_config = store_config.with_max_capacity(capacity);
                }

                Ok(Arc::new(InMemoryStore::with_config(store_config)))
            }
            StoreType::Redis => {
                let url = config.redis_url.as_ref().ok_or_else(|| {
                    DomainError::configuration("Redis store requires a redis_url")
                })?;

                let mut store_config = RedisStoreConfig::new(url);

                if let Some(prefix) = &config.key_prefix {
                    store_config = store_config.with_key_prefix(prefix.clone());
                }

                Ok(Arc::new(RedisStore::new(store_config).await?))
            }
        }
    }
}
