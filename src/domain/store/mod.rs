//! Store domain - abstract key-value capability consumed by the cache

mod repository;

pub use repository::KeyStore;

pub(crate) use repository::resolve_range;

#[cfg(test)]
pub use repository::mock::MockStore;
