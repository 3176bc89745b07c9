//! GeoIP data structures.

use serde_json::{Map, Value};

use crate::models::{DomainRecord, ErrorData, GeoData, RecordData};

/// GeoIP lookup result.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    /// The domain resolved to a private address; no geolocation request was made.
    Local { ip: String },
    /// The service located the address.
    Geo(GeoData),
    /// The request failed or the service refused.
    Error(ErrorData),
}

impl LookupResult {
    /// Merges this result over a `{fetched_at, is_local}` envelope.
    pub fn into_record(self, fetched_at: i64, is_local: bool) -> DomainRecord {
        let (is_local, data) = match self {
            LookupResult::Local { ip } => (true, RecordData::Bare { ip: Some(ip) }),
            LookupResult::Geo(geo) => (is_local, RecordData::Geo(geo)),
            LookupResult::Error(error) => (is_local, RecordData::Error(error)),
        };
        DomainRecord {
            fetched_at: Some(fetched_at),
            is_local,
            data,
            icon: None,
        }
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Builds geo data from a service response body.
///
/// Returns `None` unless the body is an object with a `country_code`. Fields
/// other than the known ones are kept in [`GeoData::extra`].
pub(crate) fn geo_from_body(body: Value) -> Option<GeoData> {
    let Value::Object(mut map) = body else {
        return None;
    };
    let country_code = take_string(&mut map, "country_code")?;
    Some(GeoData {
        country_code,
        country_name: take_string(&mut map, "country_name"),
        ip: take_string(&mut map, "ip"),
        city: take_string(&mut map, "city"),
        region: take_string(&mut map, "region"),
        postal_code: take_string(&mut map, "postal_code"),
        extra: map,
    })
}

/// Builds error data from a failed response.
///
/// JSON bodies surface their `error` and `ip` fields; anything else surfaces
/// the raw text as the error message.
pub(crate) fn error_from_body(text: &str, status: u16) -> ErrorData {
    if let Ok(Value::Object(mut map)) = serde_json::from_str::<Value>(text) {
        if map.contains_key("error") || map.contains_key("ip") {
            return ErrorData {
                error: take_string(&mut map, "error").unwrap_or_else(|| text.to_string()),
                status: Some(status),
                ip: take_string(&mut map, "ip"),
            };
        }
    }
    ErrorData {
        error: text.to_string(),
        status: Some(status),
        ip: None,
    }
}
