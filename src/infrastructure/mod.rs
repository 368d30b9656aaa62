//! Infrastructure layer - store backends, cache services and logging

pub mod cache;
pub mod logging;
pub mod store;
