//! KeyStore trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Abstract key-value store capability consumed by the caching layer.
///
/// The store owns persistence, expiry and atomicity. Values are opaque
/// byte sequences; counters and lists live in the same keyspace. A missing
/// key is an explicit absence (`None` / empty range), never an error.
#[async_trait]
pub trait KeyStore: Send + Sync + Debug {
    /// Sets a value with no expiry
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), DomainError>;

    /// Gets the raw bytes for a key, or `None` if the key does not exist
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError>;

    /// Sets a value that the store evicts after `ttl`
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Atomically increments a numeric value, returning the new value.
    /// A missing key starts from zero.
    async fn increment(&self, key: &str, delta: i64) -> Result<i64, DomainError>;

    /// Appends a value to the list at `key`, creating the list on first push
    async fn push_list(&self, key: &str, value: &[u8]) -> Result<(), DomainError>;

    /// Reads a range of the list at `key` with LRANGE semantics: `stop` is
    /// inclusive and negative indices count from the tail, so `(0, -1)` is
    /// the whole list. A missing key yields an empty range.
    async fn list_range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<Vec<u8>>, DomainError>;

    /// Flushes all entries from the store
    async fn clear(&self) -> Result<(), DomainError>;
}

/// Resolves LRANGE-style indices against a list of `len` elements,
/// returning the half-open slice bounds.
pub(crate) fn resolve_range(len: usize, start: isize, stop: isize) -> (usize, usize) {
    let len = len as isize;

    let clamp = |i: isize| -> isize {
        if i < 0 { (len + i).max(0) } else { i.min(len) }
    };

    let from = clamp(start);
    let to = (clamp(stop) + 1).min(len);

    if from >= to {
        (0, 0)
    } else {
        (from as usize, to as usize)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    enum MockEntry {
        Value(Vec<u8>),
        List(Vec<Vec<u8>>),
    }

    /// Mock store for testing, with entry seeding and error injection
    #[derive(Debug, Default)]
    pub struct MockStore {
        entries: Mutex<HashMap<String, MockEntry>>,
        error: Mutex<Option<String>>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: &str, value: &[u8]) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), MockEntry::Value(value.to_vec()));
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::store(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl KeyStore for MockStore {
        async fn set(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), MockEntry::Value(value.to_vec()));
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
            self.check_error()?;
            let entries = self.entries.lock().unwrap();

            match entries.get(key) {
                Some(MockEntry::Value(bytes)) => Ok(Some(bytes.clone())),
                Some(MockEntry::List(_)) => Err(DomainError::store(format!(
                    "key '{}' holds a list, not a value",
                    key
                ))),
                None => Ok(None),
            }
        }

        async fn set_with_ttl(
            &self,
            key: &str,
            value: &[u8],
            _ttl: Duration,
        ) -> Result<(), DomainError> {
            // The mock never expires entries; TTL behavior is covered by the
            // in-memory and redis backends.
            self.set(key, value).await
        }

        async fn increment(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
            self.check_error()?;
            let mut entries = self.entries.lock().unwrap();

            let current: i64 = match entries.get(key) {
                Some(MockEntry::Value(bytes)) => std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        DomainError::store(format!("key '{}' is not an integer", key))
                    })?,
                Some(MockEntry::List(_)) => {
                    return Err(DomainError::store(format!(
                        "key '{}' holds a list, not a counter",
                        key
                    )));
                }
                None => 0,
            };

            let new_value = current + delta;
            entries.insert(
                key.to_string(),
                MockEntry::Value(new_value.to_string().into_bytes()),
            );

            Ok(new_value)
        }

        async fn push_list(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
            self.check_error()?;
            let mut entries = self.entries.lock().unwrap();

            match entries
                .entry(key.to_string())
                .or_insert_with(|| MockEntry::List(Vec::new()))
            {
                MockEntry::List(items) => {
                    items.push(value.to_vec());
                    Ok(())
                }
                MockEntry::Value(_) => Err(DomainError::store(format!(
                    "key '{}' holds a value, not a list",
                    key
                ))),
            }
        }

        async fn list_range(
            &self,
            key: &str,
            start: isize,
            stop: isize,
        ) -> Result<Vec<Vec<u8>>, DomainError> {
            self.check_error()?;
            let entries = self.entries.lock().unwrap();

            match entries.get(key) {
                Some(MockEntry::List(items)) => {
                    let (from, to) = resolve_range(items.len(), start, stop);
                    Ok(items[from..to].to_vec())
                }
                Some(MockEntry::Value(_)) => Err(DomainError::store(format!(
                    "key '{}' holds a value, not a list",
                    key
                ))),
                None => Ok(Vec::new()),
            }
        }

        async fn clear(&self) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries.lock().unwrap().clear();
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_set_get() {
            let store = MockStore::new();
            store.set("key1", b"value1").await.unwrap();

            let result = store.get("key1").await.unwrap();
            assert_eq!(result, Some(b"value1".to_vec()));
        }

        #[tokio::test]
        async fn test_mock_get_missing() {
            let store = MockStore::new();

            let result = store.get("missing").await.unwrap();
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_mock_increment() {
            let store = MockStore::new();

            let val = store.increment("counter", 1).await.unwrap();
            assert_eq!(val, 1);

            let val = store.increment("counter", 1).await.unwrap();
            assert_eq!(val, 2);
        }

        #[tokio::test]
        async fn test_mock_increment_non_numeric() {
            let store = MockStore::new().with_entry("counter", b"not a number");

            let result = store.increment("counter", 1).await;
            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_mock_list_push_and_range() {
            let store = MockStore::new();
            store.push_list("items", b"a").await.unwrap();
            store.push_list("items", b"b").await.unwrap();
            store.push_list("items", b"c").await.unwrap();

            let all = store.list_range("items", 0, -1).await.unwrap();
            assert_eq!(all, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);

            let tail = store.list_range("items", 1, -1).await.unwrap();
            assert_eq!(tail, vec![b"b".to_vec(), b"c".to_vec()]);
        }

        #[tokio::test]
        async fn test_mock_list_range_missing() {
            let store = MockStore::new();

            let result = store.list_range("missing", 0, -1).await.unwrap();
            assert!(result.is_empty());
        }

        #[tokio::test]
        async fn test_mock_clear() {
            let store = MockStore::new();
            store.set("key1", b"value1").await.unwrap();
            store.push_list("list1", b"a").await.unwrap();

            store.clear().await.unwrap();

            assert!(store.get("key1").await.unwrap().is_none());
            assert!(store.list_range("list1", 0, -1).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_mock_with_error() {
            let store = MockStore::new().with_error("injected failure");

            let result = store.get("key").await;
            assert!(result.is_err());
        }

        #[test]
        fn test_resolve_range() {
            assert_eq!(resolve_range(3, 0, -1), (0, 3));
            assert_eq!(resolve_range(3, 1, 1), (1, 2));
            assert_eq!(resolve_range(3, -2, -1), (1, 3));
            assert_eq!(resolve_range(3, 2, 0), (0, 0));
            assert_eq!(resolve_range(0, 0, -1), (0, 0));
            assert_eq!(resolve_range(3, 0, 10), (0, 3));
        }
    }
}
