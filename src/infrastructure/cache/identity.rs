//! Identity cache - stores values under freshly minted unique keys

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::store::KeyStore;
use crate::domain::{CacheValue, DomainError};

/// Key-value cache that mints a fresh UUID key for every stored value.
///
/// Duplicate values are allowed and receive distinct keys; the returned key
/// is the sole handle for later retrieval. Reads return an explicit absence
/// for unknown keys, never a decoded default.
#[derive(Debug, Clone)]
pub struct IdentityCache {
    store: Arc<dyn KeyStore>,
}

impl IdentityCache {
    /// Creates a cache over the given store, flushing all existing state.
    ///
    /// The flush is part of the construction contract: a new cache starts
    /// from an empty store.
    pub async fn new(store: Arc<dyn KeyStore>) -> Result<Self, DomainError> {
        store.clear().await?;
        Ok(Self { store })
    }

    /// The store handle this cache operates against
    pub fn store_handle(&self) -> &Arc<dyn KeyStore> {
        &self.store
    }

    /// Stores a value under a freshly generated key and returns the key.
    ///
    /// Store failures propagate unchanged; there is no local retry.
    pub async fn store(&self, value: CacheValue) -> Result<String, DomainError> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &value.to_bytes()).await?;
        Ok(key)
    }

    /// Gets the raw bytes for a key, or `None` if the key does not exist
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        self.store.get(key).await
    }

    /// Gets a value and applies `decode` to the raw bytes when present
    pub async fn get_with<T, F>(&self, key: &str, decode: F) -> Result<Option<T>, DomainError>
    where
        F: FnOnce(Vec<u8>) -> Result<T, DomainError>,
    {
        match self.store.get(key).await? {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    /// Gets a value decoded as UTF-8 text
    pub async fn get_string(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.get_with(key, |bytes| {
            String::from_utf8(bytes)
                .map_err(|e| DomainError::decode(format!("invalid UTF-8 in value: {}", e)))
        })
        .await
    }

    /// Gets a value decoded as a base-10 integer
    pub async fn get_i64(&self, key: &str) -> Result<Option<i64>, DomainError> {
        self.get_with(key, |bytes| {
            std::str::from_utf8(&bytes)
                .map_err(|e| DomainError::decode(format!("invalid UTF-8 in value: {}", e)))?
                .parse()
                .map_err(|e| DomainError::decode(format!("invalid integer literal: {}", e)))
        })
        .await
    }
}
