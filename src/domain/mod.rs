//! Domain layer - core types, errors and capability traits

pub mod error;
pub mod store;
pub mod value;

pub use error::DomainError;
pub use store::KeyStore;
pub use value::CacheValue;
