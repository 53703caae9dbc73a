//! Param Cache Module
//!
//! Cache facade over a remote parameter store. TTLs are emulated: each value
//! is wrapped in an envelope carrying its TTL, and expiry is checked against
//! the store's last-modified time whenever the key is read.

use std::future::Future;

use chrono::{Duration, Utc};

use crate::cache::naming;
use crate::cache::Envelope;
use crate::config::{CacheConfig, CacheOptions};
use crate::error::{CacheError, Result};
use crate::store::{ParamStore, ParameterKind, PutParameter, StoreError};

// == Param Cache ==
/// Key-value cache whose entries live in a parameter store.
///
/// Holds no mutable state; clones share nothing but the store handle.
#[derive(Debug, Clone)]
pub struct ParamCache<S> {
    config: CacheConfig,
    store: S,
}

impl<S: ParamStore> ParamCache<S> {
    // == Constructor ==
    /// Creates a cache, resolving unset options against the defaults.
    ///
    /// # Defaults
    /// - `secret` - true
    /// - `base_path` - "/cache"
    /// - `key_id` - none
    pub fn new(store: S, options: CacheOptions) -> Self {
        Self {
            config: options.merge_defaults(),
            store,
        }
    }

    /// Creates a cache configured from `PARAM_CACHE_*` environment variables.
    pub fn from_env(store: S) -> Result<Self> {
        Ok(Self::new(store, CacheOptions::from_env()?))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Full parameter name used for `key`.
    pub fn parameter_name(&self, key: &str) -> String {
        naming::parameter_name(&self.config.base_path, key)
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// The TTL window starts at the last-modified time the store records for
    /// this write. A zero or negative `ttl` yields an entry that is already
    /// expired on the next read.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let name = self.parameter_name(key);
        let payload = Envelope::new(value, ttl)
            .encode()
            .map_err(CacheError::Encode)?;

        let request = PutParameter {
            name: &name,
            value: &payload,
            kind: ParameterKind::from_secret(self.config.secret),
            key_id: self.config.key_id.as_deref(),
        };
        self.call(self.store.upsert(request)).await?;
        Ok(())
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the entry is live
    /// - `Ok(None)` if the entry has expired; it is deleted on the way out
    /// - `Err(CacheError::NotFound)` if nothing is stored under the key
    /// - `Err(CacheError::Decode)` if the slot holds something other than an envelope
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let name = self.parameter_name(key);

        let parameter = self
            .call(self.store.fetch(&name, self.config.secret))
            .await?
            .filter(|p| !p.value.is_empty())
            .ok_or_else(|| CacheError::NotFound(name.clone()))?;

        let envelope = Envelope::decode(&parameter.value).map_err(|source| CacheError::Decode {
            name: name.clone(),
            source,
        })?;

        if envelope.is_expired_at(parameter.last_modified, Utc::now()) {
            // Cleanup only; a failed delete leaves a stale slot that the next get retries.
            let _ = self.call(self.store.delete(&name)).await;
            return Ok(None);
        }

        Ok(Some(envelope.value))
    }

    /// Runs one store call under the configured deadline, if any.
    async fn call<T, F>(&self, request: F) -> std::result::Result<T, StoreError>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::TimedOut),
            },
            None => request.await,
        }
    }
}
