//! cachetrace
//!
//! An instrumented in-process caching layer over an abstract key-value
//! store, with support for:
//! - Identity caching: fresh UUID key per stored value, typed retrieval
//! - Composable call instrumentation (invocation counters, call history)
//! - Replay of recorded call histories for debugging and auditing
//! - TTL-bound caching of externally fetched resources with access counting
//!
//! The store itself is an external capability (redis or in-memory moka
//! backend); see [`domain::store::KeyStore`].
//!
//! # Quickstart
//!
//! ```
//! use std::sync::Arc;
//! use cachetrace::infrastructure::store::InMemoryStore;
//! use cachetrace::{CacheValue, IdentityCache};
//!
//! # tokio_test::block_on(async {
//! let cache = IdentityCache::new(Arc::new(InMemoryStore::new())).await.unwrap();
//!
//! let key = cache.store(CacheValue::from("hello")).await.unwrap();
//! assert_eq!(cache.get_string(&key).await.unwrap(), Some("hello".to_string()));
//! # });
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{CacheValue, DomainError, KeyStore};
pub use infrastructure::cache::{
    replay, replay_stdout, CacheOperation, CountedOperation, ExpiringFetchCache,
    HistoryRecordingOperation, IdentityCache, StoreOperation,
};
pub use infrastructure::store::{StoreConfig, StoreFactory, StoreType};
