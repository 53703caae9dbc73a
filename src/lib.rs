//! Param Cache - A key-value cache stored in a remote parameter store
//!
//! The store has no native expiry, so each value is wrapped with its TTL and
//! expiry is enforced lazily when the key is read.

pub mod cache;
pub mod config;
pub mod error;
pub mod store;

pub use cache::ParamCache;
pub use config::{CacheConfig, CacheOptions};
pub use error::{CacheError, Result};
pub use store::{MemoryParamStore, ParamStore, StoreError};
