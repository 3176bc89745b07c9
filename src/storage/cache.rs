//! Per-domain record cache.
//!
//! Records are stored under the domain name as key. When a write hits the
//! store quota, the entire store is cleared and the write retried once.

use std::sync::Arc;

use serde_json::Value;

use super::store::KeyValueStore;
use crate::config::DEFAULT_ICON_PATH;
use crate::error_handling::StoreError;
use crate::models::DomainRecord;

/// Domain record cache over a shared key-value store.
#[derive(Clone)]
pub struct DomainCache {
    store: Arc<dyn KeyValueStore>,
}

impl DomainCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saves a record, overwriting any previous one.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write fails for a reason other than the
    /// quota, or if the retry after clearing the store fails too.
    pub async fn save_domain(&self, domain: &str, record: &DomainRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        match self.store.set(domain, value.clone()).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_quota() => {
                log::warn!("{e}; clearing all cached domains before saving {domain}");
                self.store.clear().await?;
                self.store.set(domain, value).await
            }
            Err(e) => Err(e),
        }
    }

    /// Reads the record for a domain.
    ///
    /// A missing key or a value that does not look like a record yields
    /// `Ok(None)`.
    pub async fn get_domain(&self, domain: &str) -> Result<Option<DomainRecord>, StoreError> {
        let Some(value) = self.store.get(domain).await? else {
            return Ok(None);
        };
        Ok(decode_record(domain, value))
    }

    /// Records which icon was last drawn for a domain.
    ///
    /// Does nothing when the domain has no record yet.
    pub async fn save_domain_icon(&self, domain: &str, icon_path: &str) -> Result<(), StoreError> {
        match self.get_domain(domain).await? {
            Some(mut record) => {
                record.icon = Some(icon_path.to_string());
                self.save_domain(domain, &record).await
            }
            None => Ok(()),
        }
    }

    /// Returns the icon last drawn for a domain, or [`DEFAULT_ICON_PATH`].
    pub async fn get_domain_icon(&self, domain: &str) -> Result<String, StoreError> {
        Ok(self
            .get_domain(domain)
            .await?
            .and_then(|record| record.icon)
            .unwrap_or_else(|| DEFAULT_ICON_PATH.to_string()))
    }
}

fn decode_record(domain: &str, value: Value) -> Option<DomainRecord> {
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("Ignoring undecodable record for {domain}: {e}");
            None
        }
    }
}
