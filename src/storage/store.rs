//! Key-value store abstraction.
//!
//! The core only needs `get`, `set`, and `clear` on a JSON key-value store. A
//! `set` may fail with [`StoreError::QuotaExceeded`], which the domain cache
//! recovers from by clearing the store.

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error_handling::StoreError;

/// An async key-value store holding JSON values.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. A missing key is `Ok(None)`, never an error.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>>;

    /// Writes a value, replacing any previous one.
    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Removes every key.
    fn clear(&self) -> BoxFuture<'_, Result<(), StoreError>>;
}

/// Returns the serialized size of a store document in bytes.
pub(crate) fn document_size(entries: &HashMap<String, Value>) -> Result<usize, StoreError> {
    Ok(serde_json::to_vec(entries)?.len())
}

/// Checks a candidate document against an optional quota.
pub(crate) fn check_quota(
    entries: &HashMap<String, Value>,
    quota: Option<usize>,
) -> Result<(), StoreError> {
    if let Some(quota) = quota {
        let needed = document_size(entries)?;
        if needed > quota {
            return Err(StoreError::QuotaExceeded { needed, quota });
        }
    }
    Ok(())
}

/// In-memory store with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes growing its JSON document beyond
    /// `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        Box::pin(async move { Ok(self.entries.lock().await.get(key).cloned()) })
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut entries = self.entries.lock().await;
            let mut candidate = entries.clone();
            candidate.insert(key.to_string(), value);
            check_quota(&candidate, self.quota)?;
            *entries = candidate;
            Ok(())
        })
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            self.entries.lock().await.clear();
            Ok(())
        })
    }
}
