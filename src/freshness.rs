//! Freshness policy for cached domain records.
//!
//! Decides, once per page-action trigger, whether a stored record is served as
//! is or replaced by a new lookup. The thresholds are asymmetric and
//! must stay exactly as defined in [`crate::config`].

use std::time::Duration;

use crate::config::{MAX_RECORD_AGE, NETWORK_ERROR_RETRY_AFTER, NOT_FOUND_RETRY_AFTER};
use crate::models::{DomainRecord, RecordData};

/// Outcome of the freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Serve the cached record.
    Fresh,
    /// Run a new lookup, with the rule that triggered it.
    Refetch(RefetchReason),
}

/// Why a record is refetched. Logged, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchReason {
    /// The caller asked for it (reload button, unmarking local).
    Requested,
    /// No record, or a record without `fetched_at`.
    Missing,
    /// A non-local record without geo or error payload.
    NoPayload,
    /// Older than the absolute ceiling.
    Expired,
    /// A 404 older than the not-found retry window.
    NotFoundRetry,
    /// A network failure older than the network retry window.
    NetworkErrorRetry,
}

/// Applies the freshness rules.
///
/// # Arguments
///
/// * `record` - The stored record, if any
/// * `refetch` - Explicit user request to refetch
/// * `now_ms` - Current time in epoch milliseconds
pub fn evaluate(record: Option<&DomainRecord>, refetch: bool, now_ms: i64) -> Freshness {
    if refetch {
        return Freshness::Refetch(RefetchReason::Requested);
    }
    let Some(record) = record else {
        return Freshness::Refetch(RefetchReason::Missing);
    };
    if record.is_local {
        return Freshness::Fresh;
    }
    let Some(fetched_at) = record.fetched_at else {
        return Freshness::Refetch(RefetchReason::Missing);
    };

    // A clock that went backwards counts as age zero.
    let age = Duration::from_millis(now_ms.saturating_sub(fetched_at).max(0) as u64);

    if age > MAX_RECORD_AGE {
        return Freshness::Refetch(RefetchReason::Expired);
    }
    match &record.data {
        RecordData::Error(error) => match error.status {
            Some(404) if age > NOT_FOUND_RETRY_AFTER => {
                Freshness::Refetch(RefetchReason::NotFoundRetry)
            }
            None if age > NETWORK_ERROR_RETRY_AFTER => {
                Freshness::Refetch(RefetchReason::NetworkErrorRetry)
            }
            _ => Freshness::Fresh,
        },
        RecordData::Bare { .. } => Freshness::Refetch(RefetchReason::NoPayload),
        RecordData::Geo(_) => Freshness::Fresh,
    }
}

impl Freshness {
    /// Returns true if a lookup should run.
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Freshness::Refetch(_))
    }
}
