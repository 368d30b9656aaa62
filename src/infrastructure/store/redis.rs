//! Redis store implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::store::KeyStore;
use crate::domain::DomainError;

/// Configuration for the redis store
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisStoreConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis-backed [`KeyStore`]
///
/// Features:
/// - TTL enforced by redis itself (SETEX)
/// - Atomic counters (INCRBY)
/// - List append/range (RPUSH/LRANGE)
/// - Connection pooling via ConnectionManager
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisStore {
    /// Creates a new redis store connection
    pub async fn new(config: RedisStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::store(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::store(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    /// Creates a redis store with default configuration
    pub async fn with_url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(RedisStoreConfig::new(url)).await
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl KeyStore for RedisStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let _: () = conn
            .set(&prefixed_key, value)
            .await
            .map_err(|e| DomainError::store(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: Option<Vec<u8>> = conn
            .get(&prefixed_key)
            .await
            .map_err(|e| DomainError::store(format!("Failed to get key '{}': {}", key, e)))?;

        Ok(result)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(&prefixed_key, value, ttl_secs)
            .await
            .map_err(|e| DomainError::store(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let new_value: i64 = conn
            .incr(&prefixed_key, delta)
            .await
            .map_err(|e| DomainError::store(format!("Failed to increment key '{}': {}", key, e)))?;

        Ok(new_value)
    }

    async fn push_list(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let _: () = conn
            .rpush(&prefixed_key, value)
            .await
            .map_err(|e| DomainError::store(format!("Failed to push to list '{}': {}", key, e)))?;

        Ok(())
    }

    async fn list_range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<Vec<u8>>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let items: Vec<Vec<u8>> = conn
            .lrange(&prefixed_key, start, stop)
            .await
            .map_err(|e| DomainError::store(format!("Failed to read list '{}': {}", key, e)))?;

        Ok(items)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        // If we have a prefix, only clear prefixed keys.
        // Otherwise, flush the entire database (use with caution!)
        match &self.config.key_prefix {
            Some(_) => {
                let pattern = self.prefix_key("*");
                let mut cursor = 0u64;

                // SCAN is safer than KEYS for production
                loop {
                    let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(100)
                        .query_async(&mut conn)
                        .await
                        .map_err(|e| {
                            DomainError::store(format!("Failed to scan keys: {}", e))
                        })?;

                    if !keys.is_empty() {
                        let _: i32 = conn.del(&keys).await.map_err(|e| {
                            DomainError::store(format!("Failed to delete keys: {}", e))
                        })?;
                    }

                    cursor = new_cursor;

                    if cursor == 0 {
                        break;
                    }
                }
            }
            None => {
                redis::cmd("FLUSHDB")
                    .query_async::<()>(&mut conn)
                    .await
                    .map_err(|e| {
                        DomainError::store(format!("Failed to flush database: {}", e))
                    })?;
            }
        }

        Ok(())
    }
}
