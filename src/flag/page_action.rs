//! Page action state and titles.

use strum_macros::AsRefStr;

use crate::config::{FLAGS_DIR, TITLE_SEPARATOR};
use crate::error_handling::FlagError;
use crate::models::{DomainRecord, GeoData, RecordKind};

/// What the page action currently shows. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum PageActionState {
    Local,
    Loading,
    Error { message: String },
    Geo { country_code: String, title: String },
}

impl PageActionState {
    /// Derives the state for a stored record.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnexpectedState`] for a record without a tag.
    pub fn from_record(domain: &str, record: &DomainRecord) -> Result<Self, FlagError> {
        match record.kind() {
            Some(RecordKind::Local) => Ok(PageActionState::Local),
            Some(RecordKind::Error) => Ok(PageActionState::Error {
                message: record
                    .error()
                    .map(|error| error.error.clone())
                    .unwrap_or_default(),
            }),
            Some(RecordKind::Geo) => {
                let geo = record.geo().ok_or_else(|| {
                    FlagError::UnexpectedState(format!("geo record for {domain} has no geo data"))
                })?;
                Ok(PageActionState::Geo {
                    country_code: geo.country_code.clone(),
                    title: location_title(geo),
                })
            }
            None => Err(FlagError::UnexpectedState(format!(
                "record for {domain} is neither local nor carries geo or error data: {:?}",
                record.data
            ))),
        }
    }

    /// The action title for this state.
    pub fn title(&self, domain: &str) -> String {
        match self {
            PageActionState::Local => format!("{domain} is a local resource"),
            PageActionState::Loading => format!("Locating {domain}…"),
            PageActionState::Error { message } => format!("Error: {message}"),
            PageActionState::Geo { title, .. } => title.clone(),
        }
    }
}

/// Joins country, region and city, skipping missing parts.
///
/// Falls back to the country code when the service named nothing.
pub fn location_title(geo: &GeoData) -> String {
    let parts: Vec<&str> = [&geo.country_name, &geo.region, &geo.city]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        geo.country_code.clone()
    } else {
        parts.join(TITLE_SEPARATOR)
    }
}

/// Flag asset for an ISO country code, e.g. `/img/flags/ua.png`.
///
/// Returns `None` unless the code is exactly two ASCII letters.
pub fn flag_path(country_code: &str) -> Option<String> {
    if country_code.len() != 2 || !country_code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some(format!("{FLAGS_DIR}/{}.png", country_code.to_ascii_lowercase()))
}
