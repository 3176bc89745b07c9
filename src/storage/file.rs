//! File-backed key-value store.
//!
//! Keeps the whole store as one JSON object on disk, loaded lazily and
//! rewritten on every change.

use std::collections::HashMap;
use std::path::PathBuf;

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use super::store::{check_quota, KeyValueStore};
use crate::error_handling::StoreError;

/// JSON file store with a byte quota.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    quota: Option<usize>,
    entries: Mutex<Option<HashMap<String, Value>>>,
}

impl JsonFileStore {
    /// Opens (lazily) the store at `path`.
    pub fn new(path: impl Into<PathBuf>, quota: Option<usize>) -> Self {
        Self {
            path: path.into(),
            quota,
            entries: Mutex::new(None),
        }
    }

    async fn load(&self) -> Result<HashMap<String, Value>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, entries: &HashMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(entries)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        Box::pin(async move {
            let mut guard = self.entries.lock().await;
            if guard.is_none() {
                *guard = Some(self.load().await?);
            }
            Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut guard = self.entries.lock().await;
            let mut candidate = match guard.take() {
                Some(entries) => entries,
                None => self.load().await?,
            };
            let previous = candidate.insert(key.to_string(), value);
            let outcome = match check_quota(&candidate, self.quota) {
                Ok(()) => self.persist(&candidate).await,
                Err(e) => Err(e),
            };
            if outcome.is_err() {
                // Keep the in-memory view equal to what is on disk
                match previous {
                    Some(previous) => candidate.insert(key.to_string(), previous),
                    None => candidate.remove(key),
                };
            }
            *guard = Some(candidate);
            outcome
        })
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let mut guard = self.entries.lock().await;
            let empty = HashMap::new();
            self.persist(&empty).await?;
            *guard = Some(empty);
            Ok(())
        })
    }
}
