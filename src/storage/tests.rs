//! Storage module tests.

use super::*;
use crate::config::DEFAULT_ICON_PATH;
use crate::error_handling::StoreError;
use crate::models::{DomainRecord, ErrorData, GeoData, RecordData};
use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Store whose first `failures` writes fail with the given error kind.
struct FlakyStore {
    inner: MemoryStore,
    failures: AtomicUsize,
    quota: bool,
    sets: Mutex<Vec<(String, Value)>>,
    clears: AtomicUsize,
}

impl FlakyStore {
    fn new(failures: usize, quota: bool) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            failures: AtomicUsize::new(failures),
            quota,
            sets: Mutex::new(Vec::new()),
            clears: AtomicUsize::new(0),
        })
    }

    fn sets(&self) -> Vec<(String, Value)> {
        self.sets.lock().unwrap().clone()
    }
}

impl KeyValueStore for FlakyStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        self.inner.get(key)
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>> {
        self.sets
            .lock()
            .unwrap()
            .push((key.to_string(), value.clone()));
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            let err = if self.quota {
                StoreError::QuotaExceeded {
                    needed: 10,
                    quota: 1,
                }
            } else {
                StoreError::Backend("disk unplugged".into())
            };
            return Box::pin(async move { Err(err) });
        }
        self.inner.set(key, value)
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

fn geo_record() -> DomainRecord {
    DomainRecord {
        fetched_at: Some(1_700_000_000_000),
        is_local: false,
        data: RecordData::Geo(GeoData {
            country_code: "UA".into(),
            country_name: Some("Ukraine".into()),
            ip: Some("9.9.9.9".into()),
            city: Some("Boyarka".into()),
            region: Some("Kyiv Metro Area".into()),
            postal_code: None,
            extra: Default::default(),
        }),
        icon: None,
    }
}

#[tokio::test]
async fn test_save_then_get_round_trip() {
    let cache = DomainCache::new(Arc::new(MemoryStore::new()));
    let record = geo_record();
    cache.save_domain("proper.site.ua", &record).await.unwrap();
    assert_eq!(
        cache.get_domain("proper.site.ua").await.unwrap(),
        Some(record)
    );
}

#[tokio::test]
async fn test_error_record_round_trip() {
    let cache = DomainCache::new(Arc::new(MemoryStore::new()));
    let record = DomainRecord {
        fetched_at: Some(5),
        is_local: false,
        data: RecordData::Error(ErrorData {
            error: "Not Found".into(),
            status: Some(404),
            ip: Some("1.2.3.4".into()),
        }),
        icon: Some("/img/icon.png".into()),
    };
    cache.save_domain("gone.example", &record).await.unwrap();
    assert_eq!(cache.get_domain("gone.example").await.unwrap(), Some(record));
}

#[tokio::test]
async fn test_missing_domain_is_none() {
    let cache = DomainCache::new(Arc::new(MemoryStore::new()));
    assert_eq!(cache.get_domain("nowhere.example").await.unwrap(), None);
}

#[tokio::test]
async fn test_undecodable_value_is_none() {
    let store = Arc::new(MemoryStore::new());
    store.set("weird.example", json!("just a string")).await.unwrap();
    store
        .set("typed.example", json!({"is_local": "yes"}))
        .await
        .unwrap();
    let cache = DomainCache::new(store);
    assert_eq!(cache.get_domain("weird.example").await.unwrap(), None);
    assert_eq!(cache.get_domain("typed.example").await.unwrap(), None);
}

#[tokio::test]
async fn test_quota_failure_clears_and_retries_once() {
    let store = FlakyStore::new(1, true);
    let cache = DomainCache::new(store.clone());
    let record = geo_record();

    cache.save_domain("proper.site.ua", &record).await.unwrap();

    let sets = store.sets();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0], sets[1]);
    assert_eq!(store.clears.load(Ordering::SeqCst), 1);
    assert_eq!(
        cache.get_domain("proper.site.ua").await.unwrap(),
        Some(record)
    );
}

#[tokio::test]
async fn test_second_quota_failure_propagates() {
    let store = FlakyStore::new(2, true);
    let cache = DomainCache::new(store.clone());

    let result = cache.save_domain("proper.site.ua", &geo_record()).await;

    assert!(matches!(result, Err(StoreError::QuotaExceeded { .. })));
    assert_eq!(store.sets().len(), 2);
    assert_eq!(store.clears.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_other_write_failures_do_not_clear() {
    let store = FlakyStore::new(1, false);
    let cache = DomainCache::new(store.clone());

    let result = cache.save_domain("proper.site.ua", &geo_record()).await;

    assert!(matches!(result, Err(StoreError::Backend(_))));
    assert_eq!(store.sets().len(), 1);
    assert_eq!(store.clears.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_save_domain_icon_without_record_writes_nothing() {
    let store = FlakyStore::new(0, true);
    let cache = DomainCache::new(store.clone());

    cache
        .save_domain_icon("fresh.example", "/img/flags/ua.png")
        .await
        .unwrap();

    assert!(store.sets().is_empty());
    assert_eq!(cache.get_domain("fresh.example").await.unwrap(), None);
}

#[tokio::test]
async fn test_save_domain_icon_merges_into_record() {
    let cache = DomainCache::new(Arc::new(MemoryStore::new()));
    cache.save_domain("proper.site.ua", &geo_record()).await.unwrap();

    cache
        .save_domain_icon("proper.site.ua", "/img/flags/ua.png")
        .await
        .unwrap();

    let stored = cache.get_domain("proper.site.ua").await.unwrap().unwrap();
    assert_eq!(stored.icon.as_deref(), Some("/img/flags/ua.png"));
    assert_eq!(stored.data, geo_record().data);
    assert_eq!(
        cache.get_domain_icon("proper.site.ua").await.unwrap(),
        "/img/flags/ua.png"
    );
}

#[tokio::test]
async fn test_get_domain_icon_defaults() {
    let cache = DomainCache::new(Arc::new(MemoryStore::new()));
    assert_eq!(
        cache.get_domain_icon("unknown.example").await.unwrap(),
        DEFAULT_ICON_PATH
    );
    cache.save_domain("known.example", &geo_record()).await.unwrap();
    assert_eq!(
        cache.get_domain_icon("known.example").await.unwrap(),
        DEFAULT_ICON_PATH
    );
}

#[tokio::test]
async fn test_memory_store_quota() {
    let store = MemoryStore::with_quota(64);
    store.set("a", json!("small")).await.unwrap();
    let err = store.set("b", json!("x".repeat(100))).await.unwrap_err();
    assert!(err.is_quota());
    // The rejected write left the store untouched
    assert_eq!(store.get("b").await.unwrap(), None);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_quota_recovery_with_memory_store() {
    let store = Arc::new(MemoryStore::with_quota(400));
    let cache = DomainCache::new(store.clone());
    for i in 0..20 {
        cache
            .save_domain(&format!("site{i}.example"), &geo_record())
            .await
            .unwrap();
    }
    // Older records were evicted wholesale at some point, the latest survived
    assert!(store.len().await < 20);
    assert!(cache.get_domain("site19.example").await.unwrap().is_some());
}

#[tokio::test]
async fn test_json_file_store_persists_across_instances() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let store = JsonFileStore::new(&path, None);
    store.set("example.com", json!({"is_local": true})).await.unwrap();
    drop(store);

    let reopened = JsonFileStore::new(&path, None);
    assert_eq!(
        reopened.get("example.com").await.unwrap(),
        Some(json!({"is_local": true}))
    );
    reopened.clear().await.unwrap();
    assert_eq!(reopened.get("example.com").await.unwrap(), None);
    assert_eq!(
        JsonFileStore::new(&path, None).get("example.com").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_json_file_store_quota_keeps_disk_state() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let store = JsonFileStore::new(&path, Some(40));

    store.set("a", json!(1)).await.unwrap();
    let err = store.set("b", json!("y".repeat(64))).await.unwrap_err();
    assert!(err.is_quota());
    assert_eq!(store.get("b").await.unwrap(), None);
    assert_eq!(store.get("a").await.unwrap(), Some(json!(1)));
}
