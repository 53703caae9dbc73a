//! Parameter Store Module
//!
//! The three-operation capability the cache needs from a remote parameter
//! store, an in-memory implementation, and (with the `ssm` feature) an AWS
//! Systems Manager client.

pub mod memory;
#[cfg(feature = "ssm")]
pub mod ssm;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::{MemoryParamStore, StoreCall, StoreOperation};
#[cfg(feature = "ssm")]
pub use ssm::SsmParamStore;

// == Store Error ==
/// Failure reported by a parameter store call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("throttled: {0}")]
    Throttled(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The call did not finish before its deadline
    #[error("store call timed out")]
    TimedOut,

    #[error("store error: {0}")]
    Other(String),
}

// == Parameter Types ==
/// How the store should keep a parameter value at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Plain text (`String`)
    Plain,
    /// Encrypted at rest (`SecureString`)
    Encrypted,
}

impl ParameterKind {
    pub fn from_secret(secret: bool) -> Self {
        if secret {
            ParameterKind::Encrypted
        } else {
            ParameterKind::Plain
        }
    }

    /// Name the store uses for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Plain => "String",
            ParameterKind::Encrypted => "SecureString",
        }
    }
}

/// A parameter as returned by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub value: String,
    /// Time of the last write, as recorded by the store
    pub last_modified: DateTime<Utc>,
}

/// Arguments of an upsert call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutParameter<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub kind: ParameterKind,
    pub key_id: Option<&'a str>,
}

// == Param Store Trait ==
/// Remote parameter store, consumed through fetch, upsert and delete.
///
/// Implementations own transport, auth and retry policy.
#[async_trait]
pub trait ParamStore: Send + Sync {
    /// Fetches a parameter by name. `Ok(None)` means the name does not exist.
    async fn fetch(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<Option<Parameter>, StoreError>;

    /// Creates or overwrites a parameter.
    async fn upsert(&self, request: PutParameter<'_>) -> Result<(), StoreError>;

    /// Deletes a parameter by name.
    async fn delete(&self, name: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ParamStore + ?Sized> ParamStore for Arc<T> {
    async fn fetch(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<Option<Parameter>, StoreError> {
        (**self).fetch(name, with_decryption).await
    }

    async fn upsert(&self, request: PutParameter<'_>) -> Result<(), StoreError> {
        (**self).upsert(request).await
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        (**self).delete(name).await
    }
}
