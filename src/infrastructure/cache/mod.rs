//! Cache infrastructure - identity cache, instrumentation and fetch cache

mod fetch;
mod identity;
mod instrument;

pub use fetch::{ExpiringFetchCache, DEFAULT_FETCH_TTL};
pub use identity::IdentityCache;
pub use instrument::{
    replay, replay_stdout, CacheOperation, CountedOperation, HistoryRecordingOperation,
    StoreOperation,
};
