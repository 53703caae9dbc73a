//! In-Memory Parameter Store
//!
//! A `ParamStore` backed by a HashMap. Every call is recorded so tests can
//! assert on the exact sequence of store operations, and failures can be
//! injected per operation. Values are kept as given: the kind and key id are
//! recorded but nothing is actually encrypted.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::{ParamStore, Parameter, ParameterKind, PutParameter, StoreError};

// == Stored Parameter ==
/// A parameter slot as held by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredParameter {
    pub value: String,
    pub kind: ParameterKind,
    pub key_id: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// The three store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Fetch,
    Upsert,
    Delete,
}

/// One recorded call, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Fetch {
        name: String,
        with_decryption: bool,
    },
    Upsert {
        name: String,
        value: String,
        kind: ParameterKind,
        key_id: Option<String>,
    },
    Delete {
        name: String,
    },
}

impl StoreCall {
    pub fn operation(&self) -> StoreOperation {
        match self {
            StoreCall::Fetch { .. } => StoreOperation::Fetch,
            StoreCall::Upsert { .. } => StoreOperation::Upsert,
            StoreCall::Delete { .. } => StoreOperation::Delete,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StoreCall::Fetch { name, .. }
            | StoreCall::Upsert { name, .. }
            | StoreCall::Delete { name } => name,
        }
    }
}

// == Memory Param Store ==
#[derive(Debug, Default)]
pub struct MemoryParamStore {
    /// Parameter slots by full name
    slots: RwLock<HashMap<String, StoredParameter>>,
    /// Every call received, in order
    calls: Mutex<Vec<StoreCall>>,
    /// One-shot failures, consumed by the next call of that operation
    failures: Mutex<HashMap<StoreOperation, StoreError>>,
}

impl MemoryParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    // == Seeding ==
    /// Writes a plain parameter stamped with the current time, bypassing the call log.
    pub async fn seed(&self, name: impl Into<String>, value: impl Into<String>) {
        self.seed_at(name, value, Utc::now()).await;
    }

    /// Writes a plain parameter with an explicit last-modified time, bypassing the call log.
    pub async fn seed_at(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
        last_modified: DateTime<Utc>,
    ) {
        let stored = StoredParameter {
            value: value.into(),
            kind: ParameterKind::Plain,
            key_id: None,
            last_modified,
        };
        self.slots.write().await.insert(name.into(), stored);
    }

    // == Failure Injection ==
    /// Makes the next call of `operation` fail with `error`.
    pub async fn fail_next(&self, operation: StoreOperation, error: StoreError) {
        self.failures.lock().await.insert(operation, error);
    }

    // == Inspection ==
    /// Returns the stored slot for a name, if any.
    pub async fn parameter(&self, name: &str) -> Option<StoredParameter> {
        self.slots.read().await.get(name).cloned()
    }

    /// Returns true if a slot exists for the name.
    pub async fn contains(&self, name: &str) -> bool {
        self.slots.read().await.contains_key(name)
    }

    /// Returns the number of stored parameters.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Returns every recorded call, oldest first.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    /// Returns the recorded operation sequence.
    pub async fn operations(&self) -> Vec<StoreOperation> {
        self.calls
            .lock()
            .await
            .iter()
            .map(StoreCall::operation)
            .collect()
    }

    /// Counts recorded calls of one operation.
    pub async fn count(&self, operation: StoreOperation) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    async fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        let operation = call.operation();
        debug!("Memory store {:?} {}", operation, call.name());
        self.calls.lock().await.push(call);

        match self.failures.lock().await.remove(&operation) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ParamStore for MemoryParamStore {
    async fn fetch(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<Option<Parameter>, StoreError> {
        self.record(StoreCall::Fetch {
            name: name.to_string(),
            with_decryption,
        })
        .await?;

        let slots = self.slots.read().await;
        Ok(slots.get(name).map(|stored| Parameter {
            value: stored.value.clone(),
            last_modified: stored.last_modified,
        }))
    }

    async fn upsert(&self, request: PutParameter<'_>) -> Result<(), StoreError> {
        self.record(StoreCall::Upsert {
            name: request.name.to_string(),
            value: request.value.to_string(),
            kind: request.kind,
            key_id: request.key_id.map(str::to_string),
        })
        .await?;

        let stored = StoredParameter {
            value: request.value.to_string(),
            kind: request.kind,
            key_id: request.key_id.map(str::to_string),
            last_modified: Utc::now(),
        };
        self.slots
            .write()
            .await
            .insert(request.name.to_string(), stored);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Delete {
            name: name.to_string(),
        })
        .await?;

        match self.slots.write().await.remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::Other(format!("parameter not found: {name}"))),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn put<'a>(name: &'a str, value: &'a str) -> PutParameter<'a> {
        PutParameter {
            name,
            value,
            kind: ParameterKind::Encrypted,
            key_id: Some("alias/cache"),
        }
    }

    #[tokio::test]
    async fn test_fetch_missing_is_none() {
        let store = MemoryParamStore::new();

        let result = store.fetch("/cache/none", true).await.unwrap();
        assert!(result.is_none());
        assert_eq!(store.operations().await, vec![StoreOperation::Fetch]);
    }

    #[tokio::test]
    async fn test_upsert_then_fetch() {
        let store = MemoryParamStore::new();
        let before = Utc::now();

        store.upsert(put("/cache/a", "value")).await.unwrap();
        let param = store.fetch("/cache/a", true).await.unwrap().unwrap();

        assert_eq!(param.value, "value");
        assert!(param.last_modified >= before);

        let stored = store.parameter("/cache/a").await.unwrap();
        assert_eq!(stored.kind, ParameterKind::Encrypted);
        assert_eq!(stored.key_id.as_deref(), Some("alias/cache"));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_and_restamps() {
        let store = MemoryParamStore::new();
        let old = Utc::now() - Duration::hours(1);
        store.seed_at("/cache/a", "old", old).await;

        store.upsert(put("/cache/a", "new")).await.unwrap();

        let stored = store.parameter("/cache/a").await.unwrap();
        assert_eq!(stored.value, "new");
        assert!(stored.last_modified > old);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_removes_slot() {
        let store = MemoryParamStore::new();
        store.seed("/cache/a", "value").await;

        store.delete("/cache/a").await.unwrap();
        assert!(store.is_empty().await);

        let missing = store.delete("/cache/a").await;
        assert!(matches!(missing, Err(StoreError::Other(_))));
    }

    #[tokio::test]
    async fn test_seed_is_not_recorded() {
        let store = MemoryParamStore::new();
        store.seed("/cache/a", "value").await;

        assert!(store.contains("/cache/a").await);
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_calls_record_arguments_in_order() {
        let store = MemoryParamStore::new();

        store.upsert(put("/cache/a", "v")).await.unwrap();
        store.fetch("/cache/a", false).await.unwrap();
        store.delete("/cache/a").await.unwrap();

        let calls = store.calls().await;
        assert_eq!(
            calls,
            vec![
                StoreCall::Upsert {
                    name: "/cache/a".to_string(),
                    value: "v".to_string(),
                    kind: ParameterKind::Encrypted,
                    key_id: Some("alias/cache".to_string()),
                },
                StoreCall::Fetch {
                    name: "/cache/a".to_string(),
                    with_decryption: false,
                },
                StoreCall::Delete {
                    name: "/cache/a".to_string(),
                },
            ]
        );
        assert_eq!(store.count(StoreOperation::Upsert).await, 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let store = MemoryParamStore::new();
        store
            .fail_next(
                StoreOperation::Upsert,
                StoreError::AccessDenied("no ssm:PutParameter".to_string()),
            )
            .await;

        let first = store.upsert(put("/cache/a", "v")).await;
        assert_eq!(
            first,
            Err(StoreError::AccessDenied("no ssm:PutParameter".to_string()))
        );
        assert!(!store.contains("/cache/a").await);

        store.upsert(put("/cache/a", "v")).await.unwrap();
        assert!(store.contains("/cache/a").await);
        assert_eq!(store.count(StoreOperation::Upsert).await, 2);
    }
}
