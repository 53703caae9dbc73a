//! Configuration Module
//!
//! Cache options with per-field "unset" representation, merged with defaults
//! once when the cache is constructed.

use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::{CacheError, Result};

/// Default namespace for cache parameters.
pub const DEFAULT_BASE_PATH: &str = "/cache";

/// Default secrecy flag: values are stored encrypted.
pub const DEFAULT_SECRET: bool = true;

// == Environment Variables ==
const ENV_SECRET: &str = "PARAM_CACHE_SECRET";
const ENV_BASE_PATH: &str = "PARAM_CACHE_BASE_PATH";
const ENV_KEY_ID: &str = "PARAM_CACHE_KEY_ID";
const ENV_TIMEOUT_SECS: &str = "PARAM_CACHE_TIMEOUT_SECS";

/// Caller-supplied cache options.
///
/// Every field may be left unset; `merge_defaults` fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Store values encrypted (`SecureString`) when true, plain (`String`) when false
    pub secret: Option<bool>,
    /// Namespace the parameters live under, without a trailing slash
    pub base_path: Option<String>,
    /// Identifier of the key used to encrypt parameter values
    pub key_id: Option<String>,
    /// Deadline applied to each individual store call
    pub timeout: Option<Duration>,
}

/// Resolved, immutable cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub secret: bool,
    pub base_path: String,
    pub key_id: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheOptions::default().merge_defaults()
    }
}

impl CacheOptions {
    pub fn secret(mut self, secret: bool) -> Self {
        self.secret = Some(secret);
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    // == Merge Defaults ==
    /// Resolves unset fields against the defaults.
    ///
    /// # Defaults
    /// - `secret` - true
    /// - `base_path` - "/cache"
    /// - `key_id` - none
    /// - `timeout` - none
    pub fn merge_defaults(self) -> CacheConfig {
        CacheConfig {
            secret: self.secret.unwrap_or(DEFAULT_SECRET),
            base_path: self
                .base_path
                .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            key_id: self.key_id,
            timeout: self.timeout,
        }
    }

    /// Loads options from environment variables.
    ///
    /// # Environment Variables
    /// - `PARAM_CACHE_SECRET` - `true`/`false` (or `1`/`0`)
    /// - `PARAM_CACHE_BASE_PATH` - parameter namespace
    /// - `PARAM_CACHE_KEY_ID` - encryption key reference
    /// - `PARAM_CACHE_TIMEOUT_SECS` - per-call deadline in seconds
    ///
    /// Unset or empty variables stay unset. A value that cannot be parsed is a
    /// construction error rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let options = Self::from_lookup(|name| env::var(name).ok())?;
        info!(
            "Cache options loaded from environment: secret={:?}, base_path={:?}, key_id_set={}, timeout={:?}",
            options.secret,
            options.base_path,
            options.key_id.is_some(),
            options.timeout
        );
        Ok(options)
    }

    /// Builds options from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let secret = read(ENV_SECRET).map(|v| parse_bool(ENV_SECRET, &v)).transpose()?;
        let timeout = read(ENV_TIMEOUT_SECS)
            .map(|v| {
                v.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    CacheError::Construction(format!("{ENV_TIMEOUT_SECS}={v:?}: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            secret,
            base_path: read(ENV_BASE_PATH),
            key_id: read(ENV_KEY_ID),
            timeout,
        })
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(CacheError::Construction(format!(
            "{name}={other:?}: expected true or false"
        ))),
    }
}
