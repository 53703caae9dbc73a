//! Error types for the parameter cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::store::StoreError;

// == Cache Error Enum ==
/// Unified error type for cache operations.
///
/// An expired entry is deliberately absent from this list: `get` reports it
/// as `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No payload is stored under the parameter name
    #[error("no parameter found: {0}")]
    NotFound(String),

    /// The stored payload is not a valid cache envelope
    #[error("invalid cache entry at {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope could not be serialized
    #[error("failed to encode cache entry: {0}")]
    Encode(#[source] serde_json::Error),

    /// The parameter store rejected or failed the call
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be loaded while building the cache
    #[error("failed to construct cache: {0}")]
    Construction(String),
}

impl CacheError {
    /// Returns true when the key has never been written (or was cleaned up).
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
