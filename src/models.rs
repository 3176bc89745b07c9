//! Domain record model.
//!
//! A [`DomainRecord`] is the per-domain cache entry. On disk it is a flat JSON
//! object (`fetched_at`, `is_local`, then either geo fields, an `error`, or
//! neither); in memory the payload is the [`RecordData`] sum type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geolocation data for a resolved domain, as returned by the geolocation service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoData {
    /// ISO 3166-1 alpha-2 country code (e.g., "UA")
    pub country_code: String,
    /// Country name in English
    pub country_name: Option<String>,
    /// Address the service located
    pub ip: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    /// Any other fields the service returned, kept verbatim.
    pub extra: Map<String, Value>,
}

/// A failed lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorData {
    /// Error message (exception text or response body)
    pub error: String,
    /// HTTP status, absent for failures before any response
    pub status: Option<u16>,
    /// Address the service reported, if any
    pub ip: Option<String>,
}

/// Payload of a domain record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    /// No geo or error payload. Used for local records; `ip` is set when the
    /// domain resolved to a private address.
    Bare { ip: Option<String> },
    /// Successful geolocation.
    Geo(GeoData),
    /// Failed geolocation.
    Error(ErrorData),
}

/// The tag a record carries at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Local,
    Geo,
    Error,
}

/// Persisted per-domain cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRecord", into = "StoredRecord")]
pub struct DomainRecord {
    /// Epoch milliseconds of the last (re)computation.
    pub fetched_at: Option<i64>,
    /// Private-range address, local host name, or user override.
    pub is_local: bool,
    pub data: RecordData,
    /// Icon asset last drawn for this domain.
    pub icon: Option<String>,
}

impl DomainRecord {
    /// A local record with no payload.
    pub fn local(fetched_at: i64) -> Self {
        Self {
            fetched_at: Some(fetched_at),
            is_local: true,
            data: RecordData::Bare { ip: None },
            icon: None,
        }
    }

    /// Derives the record's tag. `is_local` wins over the payload so a user
    /// override hides whatever was looked up.
    ///
    /// Returns `None` for a non-local record without payload, which no lookup
    /// produces.
    pub fn kind(&self) -> Option<RecordKind> {
        if self.is_local {
            return Some(RecordKind::Local);
        }
        match self.data {
            RecordData::Geo(_) => Some(RecordKind::Geo),
            RecordData::Error(_) => Some(RecordKind::Error),
            RecordData::Bare { .. } => None,
        }
    }

    /// Geo payload, if any.
    pub fn geo(&self) -> Option<&GeoData> {
        match &self.data {
            RecordData::Geo(geo) => Some(geo),
            _ => None,
        }
    }

    /// Error payload, if any.
    pub fn error(&self) -> Option<&ErrorData> {
        match &self.data {
            RecordData::Error(error) => Some(error),
            _ => None,
        }
    }

    /// The resolved address, whichever payload carries it.
    pub fn ip(&self) -> Option<&str> {
        match &self.data {
            RecordData::Bare { ip } => ip.as_deref(),
            RecordData::Geo(geo) => geo.ip.as_deref(),
            RecordData::Error(error) => error.ip.as_deref(),
        }
    }
}

/// On-disk shape of a domain record. Every field is optional so that records
/// written by older or newer versions still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoredRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<i64>,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredRecord {
    /// Splits the flat shape into a payload, preferring geo data over an error.
    pub(crate) fn into_data(self) -> RecordData {
        match (self.country_code, self.error) {
            (Some(country_code), _) => RecordData::Geo(GeoData {
                country_code,
                country_name: self.country_name,
                ip: self.ip,
                city: self.city,
                region: self.region,
                postal_code: self.postal_code,
                extra: self.extra,
            }),
            (None, Some(error)) => RecordData::Error(ErrorData {
                error,
                status: self.status,
                ip: self.ip,
            }),
            (None, None) => RecordData::Bare { ip: self.ip },
        }
    }
}

impl From<StoredRecord> for DomainRecord {
    fn from(mut stored: StoredRecord) -> Self {
        Self {
            fetched_at: stored.fetched_at,
            is_local: stored.is_local,
            icon: stored.icon.take(),
            data: stored.into_data(),
        }
    }
}

impl From<DomainRecord> for StoredRecord {
    fn from(record: DomainRecord) -> Self {
        let mut stored = StoredRecord {
            fetched_at: record.fetched_at,
            is_local: record.is_local,
            icon: record.icon,
            ..Default::default()
        };
        match record.data {
            RecordData::Bare { ip } => stored.ip = ip,
            RecordData::Geo(geo) => {
                stored.country_code = Some(geo.country_code);
                stored.country_name = geo.country_name;
                stored.ip = geo.ip;
                stored.city = geo.city;
                stored.region = geo.region;
                stored.postal_code = geo.postal_code;
                stored.extra = geo.extra;
            }
            RecordData::Error(error) => {
                stored.error = Some(error.error);
                stored.status = error.status;
                stored.ip = error.ip;
            }
        }
        stored
    }
}
