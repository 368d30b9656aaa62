//! Store infrastructure - KeyStore backends

mod factory;
mod in_memory;
mod redis;

pub use factory::{StoreConfig, StoreFactory, StoreType};
pub use in_memory::{InMemoryStore, InMemoryStoreConfig};
pub use redis::{RedisStore, RedisStoreConfig};
