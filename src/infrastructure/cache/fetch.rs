//! Expiring fetch cache - TTL-bound cache for externally fetched resources

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::store::KeyStore;
use crate::domain::DomainError;

/// Default time-to-live for cached resource content
pub const DEFAULT_FETCH_TTL: Duration = Duration::from_secs(10);

/// TTL-bound cache over an abstract "fetch resource by key" delegate.
///
/// Every access bumps a per-resource counter under `count:<key>`; the
/// fetched content lives under `result:<key>` until the store expires it.
/// The counter never expires and accumulates across refresh cycles.
///
/// Concurrent misses for the same key are not coalesced: each one invokes
/// the delegate independently and the last write wins.
#[derive(Debug, Clone)]
pub struct ExpiringFetchCache {
    store: Arc<dyn KeyStore>,
    ttl: Duration,
}

impl ExpiringFetchCache {
    /// Creates a fetch cache with the default 10 second TTL
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self::with_ttl(store, DEFAULT_FETCH_TTL)
    }

    /// Creates a fetch cache with the given content TTL
    pub fn with_ttl(store: Arc<dyn KeyStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    fn count_key(resource_key: &str) -> String {
        format!("count:{}", resource_key)
    }

    fn result_key(resource_key: &str) -> String {
        format!("result:{}", resource_key)
    }

    /// Number of times `resource_key` has been requested through this cache
    pub async fn access_count(&self, resource_key: &str) -> Result<i64, DomainError> {
        match self.store.get(&Self::count_key(resource_key)).await? {
            Some(bytes) => std::str::from_utf8(&bytes)
                .map_err(|e| {
                    DomainError::decode(format!("invalid counter for '{}': {}", resource_key, e))
                })?
                .parse()
                .map_err(|e| {
                    DomainError::decode(format!("invalid counter for '{}': {}", resource_key, e))
                }),
            None => Ok(0),
        }
    }

    /// Returns the content for `resource_key`, fetching on cache miss.
    ///
    /// The access counter is bumped unconditionally on every call. On a hit
    /// the cached content is returned without invoking the delegate; on a
    /// miss the delegate's content is stored with the configured TTL. A
    /// failing delegate propagates and nothing is cached.
    pub async fn fetch_cached<F, Fut>(
        &self,
        resource_key: &str,
        fetch: F,
    ) -> Result<String, DomainError>
    where
        F: FnOnce(&str) -> Fut,
        Fut: Future<Output = Result<String, DomainError>>,
    {
        self.store.increment(&Self::count_key(resource_key), 1).await?;

        let result_key = Self::result_key(resource_key);

        if let Some(cached) = self.store.get(&result_key).await? {
            tracing::debug!(resource = resource_key, "Cache hit for resource");

            return String::from_utf8(cached).map_err(|e| {
                DomainError::decode(format!(
                    "invalid UTF-8 in cached content for '{}': {}",
                    resource_key, e
                ))
            });
        }

        tracing::debug!(resource = resource_key, "Cache miss, fetching resource");

        let content = fetch(resource_key).await?;

        self.store
            .set_with_ttl(&result_key, content.as_bytes(), self.ttl)
            .await?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::infrastructure::store::InMemoryStore;

    fn new_cache(ttl: Duration) -> (ExpiringFetchCache, Arc<dyn KeyStore>) {
        let store: Arc<dyn KeyStore> = Arc::new(InMemoryStore::new());
        (ExpiringFetchCache::with_ttl(Arc::clone(&store), ttl), store)
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let (cache, _store) = new_cache(Duration::from_secs(10));
        let calls = AtomicUsize::new(0);

        let fetch = |_key: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("<html>hello</html>".to_string()) }
        };

        let first = cache.fetch_cached("http://example.com", fetch).await.unwrap();
        assert_eq!(first, "<html>hello</html>");
        assert_eq!(cache.access_count("http://example.com").await.unwrap(), 1);

        let second = cache
            .fetch_cached("http://example.com", |_key: &str| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("fresh".to_string())
            })
            .await
            .unwrap();

        assert_eq!(second, "<html>hello</html>");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.access_count("http://example.com").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_refetches_after_ttl_expiry() {
        let (cache, _store) = new_cache(Duration::from_millis(20));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .fetch_cached("http://example.com", |_key: &str| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok("content".to_string()) }
                })
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(40)).await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_counter_survives_content_expiry() {
        let (cache, _store) = new_cache(Duration::from_millis(20));

        cache
            .fetch_cached("http://example.com", |_key: &str| async {
                Ok("content".to_string())
            })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        cache
            .fetch_cached("http://example.com", |_key: &str| async {
                Ok("content".to_string())
            })
            .await
            .unwrap();

        assert_eq!(cache.access_count("http://example.com").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_and_caches_nothing() {
        let (cache, store) = new_cache(Duration::from_secs(10));

        let result = cache
            .fetch_cached("http://example.com", |_key: &str| async {
                Err(DomainError::fetch("resource unreachable"))
            })
            .await;

        assert!(matches!(result, Err(DomainError::Fetch { .. })));
        assert!(store.get("result:http://example.com").await.unwrap().is_none());

        // The attempt still counted
        assert_eq!(cache.access_count("http://example.com").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counter_increments_on_hit_and_miss() {
        let (cache, store) = new_cache(Duration::from_secs(10));

        for _ in 0..3 {
            cache
                .fetch_cached("http://example.com", |_key: &str| async {
                    Ok("content".to_string())
                })
                .await
                .unwrap();
        }

        let count = store.get("count:http://example.com").await.unwrap().unwrap();
        assert_eq!(count, b"3");
    }

    #[tokio::test]
    async fn test_distinct_resources_have_distinct_counters() {
        let (cache, _store) = new_cache(Duration::from_secs(10));

        cache
            .fetch_cached("http://a.example", |_key: &str| async {
                Ok("a".to_string())
            })
            .await
            .unwrap();
        cache
            .fetch_cached("http://b.example", |_key: &str| async {
                Ok("b".to_string())
            })
            .await
            .unwrap();

        assert_eq!(cache.access_count("http://a.example").await.unwrap(), 1);
        assert_eq!(cache.access_count("http://b.example").await.unwrap(), 1);
        assert_eq!(cache.access_count("http://c.example").await.unwrap(), 0);
    }
}
