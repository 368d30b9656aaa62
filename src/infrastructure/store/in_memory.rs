//! In-memory store implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::domain::store::{resolve_range, KeyStore};
use crate::domain::DomainError;

/// Configuration for the in-memory store
#[derive(Debug, Clone)]
pub struct InMemoryStoreConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryStoreConfig {
    /// Creates a new configuration with specified max capacity
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

#[derive(Debug, Clone)]
enum EntryData {
    Value(Vec<u8>),
    List(Vec<Vec<u8>>),
}

/// Store entry held in moka
#[derive(Debug, Clone)]
struct StoreEntry {
    data: EntryData,
    /// Expiration timestamp (millis since epoch); `None` never expires
    expires_at: Option<u64>,
}

/// Thread-safe in-memory [`KeyStore`] implementation using moka
///
/// TTL entries carry their own expiry stamp and are checked lazily on read,
/// so expired keys read as absent even before moka evicts them. Counters and
/// lists never expire. Read-modify-write operations (increment, list append)
/// are serialized behind an internal lock so counters stay atomic in-process.
#[derive(Debug)]
pub struct InMemoryStore {
    cache: MokaCache<String, StoreEntry>,
    write_lock: Mutex<()>,
}

impl InMemoryStore {
    /// Creates a new in-memory store with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryStoreConfig::default())
    }

    /// Creates a new in-memory store with the given configuration
    pub fn with_config(config: InMemoryStoreConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();

        Self {
            cache,
            write_lock: Mutex::new(()),
        }
    }

    fn current_time_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn is_expired(entry: &StoreEntry) -> bool {
        match entry.expires_at {
            Some(expires_at) => Self::current_time_millis() > expires_at,
            None => false,
        }
    }

    /// Reads a live entry, dropping it if its TTL has lapsed
    async fn live_entry(&self, key: &str) -> Option<StoreEntry> {
        match self.cache.get(key).await {
            Some(entry) => {
                if Self::is_expired(&entry) {
                    self.cache.remove(key).await;
                    None
                } else {
                    Some(entry)
                }
            }
            None => None,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyStore for InMemoryStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
        let entry = StoreEntry {
            data: EntryData::Value(value.to_vec()),
            expires_at: None,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        match self.live_entry(key).await {
            Some(entry) => match entry.data {
                EntryData::Value(bytes) => Ok(Some(bytes)),
                EntryData::List(_) => Err(DomainError::store(format!(
                    "key '{}' holds a list, not a value",
                    key
                ))),
            },
            None => Ok(None),
        }
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let expires_at = Self::current_time_millis() + ttl.as_millis() as u64;
        let entry = StoreEntry {
            data: EntryData::Value(value.to_vec()),
            expires_at: Some(expires_at),
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
        let _guard = self.write_lock.lock().await;

        let current: i64 = match self.live_entry(key).await {
            Some(entry) => match entry.data {
                EntryData::Value(bytes) => std::str::from_utf8(&bytes)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        DomainError::store(format!("key '{}' is not an integer", key))
                    })?,
                EntryData::List(_) => {
                    return Err(DomainError::store(format!(
                        "key '{}' holds a list, not a counter",
                        key
                    )));
                }
            },
            None => 0,
        };

        let new_value = current + delta;
        let entry = StoreEntry {
            data: EntryData::Value(new_value.to_string().into_bytes()),
            expires_at: None,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(new_value)
    }

    async fn push_list(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut items = match self.live_entry(key).await {
            Some(entry) => match entry.data {
                EntryData::List(items) => items,
                EntryData::Value(_) => {
                    return Err(DomainError::store(format!(
                        "key '{}' holds a value, not a list",
                        key
                    )));
                }
            },
            None => Vec::new(),
        };

        items.push(value.to_vec());

        let entry = StoreEntry {
            data: EntryData::List(items),
            expires_at: None,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn list_range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<Vec<u8>>, DomainError> {
        match self.live_entry(key).await {
            Some(entry) => match entry.data {
                EntryData::List(items) => {
                    let (from, to) = resolve_range(items.len(), start, stop);
                    Ok(items[from..to].to_vec())
                }
                EntryData::Value(_) => Err(DomainError::store(format!(
                    "key '{}' holds a value, not a list",
                    key
                ))),
            },
            None => Ok(Vec::new()),
        }
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}
