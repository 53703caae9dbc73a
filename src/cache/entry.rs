//! Cache Entry Module
//!
//! Defines the envelope persisted in a parameter slot: the TTL policy plus
//! the caller's value, serialized as JSON.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// == Envelope ==
/// The record stored for one key.
///
/// Wire format: `{"TTL":<seconds>,"Value":"<string>"}`. The field names are
/// shared with other readers of the same base path and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Seconds the entry stays live after the store's last-modified time
    #[serde(rename = "TTL")]
    pub ttl: u64,
    /// The stored value
    #[serde(rename = "Value")]
    pub value: String,
}

impl Envelope {
    // == Constructor ==
    /// Creates an envelope from a signed TTL.
    ///
    /// Sub-second remainders are dropped and negative durations become 0,
    /// which makes the entry expired on the next read. Expiry is measured
    /// against the store's clock: if the store's last-modified time is ahead
    /// of the local clock, a 0 TTL entry stays live until the local clock
    /// passes it.
    pub fn new(value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            ttl: ttl.num_seconds().max(0) as u64,
            value: value.into(),
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    // == Expiry ==
    /// Instant after which the entry counts as expired.
    pub fn expires_at(&self, last_modified: DateTime<Utc>) -> DateTime<Utc> {
        let ttl = i64::try_from(self.ttl)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        last_modified
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Checks expiry against `now`.
    ///
    /// Boundary condition: the entry is still live at exactly `expires_at` and
    /// expires strictly after it.
    pub fn is_expired_at(&self, last_modified: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now > self.expires_at(last_modified)
    }
}
