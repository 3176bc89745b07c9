//! Popup view model and its text rendering.

use std::fmt;
use std::time::Duration;

use strum_macros::{AsRefStr, Display as StrumDisplay};

use crate::flag::location_title;
use crate::models::{DomainRecord, RecordData};

/// Body layout of the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum PopupLayout {
    Local,
    NotFound,
    Regular,
}

impl PopupLayout {
    pub fn for_record(record: &DomainRecord) -> Self {
        if record.is_local {
            return PopupLayout::Local;
        }
        match &record.data {
            RecordData::Error(error) if error.status == Some(404) => PopupLayout::NotFound,
            _ => PopupLayout::Regular,
        }
    }
}

/// The mark/unmark-local button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum LocalToggle {
    MarkLocal,
    UnmarkLocal,
}

/// Popup toolbar. Reload is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toolbar {
    pub local_toggle: Option<LocalToggle>,
}

impl Toolbar {
    /// The toggle is offered only while the record has no resolved IP, which
    /// in practice means pure-error records and bare user overrides.
    pub fn for_record(record: &DomainRecord) -> Self {
        let local_toggle = match (record.ip(), record.is_local) {
            (Some(_), _) => None,
            (None, true) => Some(LocalToggle::UnmarkLocal),
            (None, false) => Some(LocalToggle::MarkLocal),
        };
        Self { local_toggle }
    }
}

/// Decorative toolbar animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub duration: Duration,
}

/// Everything the popup shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub domain: Option<String>,
    pub record: Option<DomainRecord>,
    pub layout: Option<PopupLayout>,
    pub toolbar: Toolbar,
    pub animation: Option<Animation>,
}

impl PopupView {
    /// View for a page without a domain.
    pub fn empty() -> Self {
        Self {
            domain: None,
            record: None,
            layout: None,
            toolbar: Toolbar::default(),
            animation: None,
        }
    }

    pub fn new(domain: String, record: DomainRecord, animation: Option<Animation>) -> Self {
        Self {
            domain: Some(domain),
            layout: Some(PopupLayout::for_record(&record)),
            toolbar: Toolbar::for_record(&record),
            record: Some(record),
            animation,
        }
    }
}

impl fmt::Display for PopupView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(domain), Some(record), Some(layout)) = (&self.domain, &self.record, self.layout)
        else {
            return writeln!(f, "Nothing to locate on this page");
        };

        writeln!(f, "{domain}")?;
        match layout {
            PopupLayout::Local => writeln!(f, "{domain} is a local resource")?,
            PopupLayout::NotFound => writeln!(f, "No location known for {domain}")?,
            PopupLayout::Regular => match &record.data {
                RecordData::Geo(geo) => {
                    writeln!(f, "{}", location_title(geo))?;
                    if let Some(postal_code) = &geo.postal_code {
                        writeln!(f, "Postal code: {postal_code}")?;
                    }
                }
                RecordData::Error(error) => writeln!(f, "Error: {}", error.error)?,
                RecordData::Bare { .. } => {}
            },
        }
        if let Some(ip) = record.ip() {
            writeln!(f, "IP: {ip}")?;
        }

        write!(f, "[reload]")?;
        if let Some(toggle) = self.toolbar.local_toggle {
            write!(f, " [{toggle}]")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorData, GeoData};

    fn record(data: RecordData, is_local: bool) -> DomainRecord {
        DomainRecord {
            fetched_at: Some(1),
            is_local,
            data,
            icon: None,
        }
    }

    fn not_found() -> RecordData {
        RecordData::Error(ErrorData {
            error: "Not Found".into(),
            status: Some(404),
            ip: None,
        })
    }

    fn not_found_at(ip: &str) -> RecordData {
        RecordData::Error(ErrorData {
            error: "Not Found".into(),
            status: Some(404),
            ip: Some(ip.into()),
        })
    }

    fn geo() -> RecordData {
        RecordData::Geo(GeoData {
            country_code: "UA".into(),
            country_name: Some("Ukraine".into()),
            ip: Some("9.9.9.9".into()),
            postal_code: Some("08150".into()),
            ..Default::default()
        })
    }

    #[test]
    fn test_layouts() {
        assert_eq!(PopupLayout::for_record(&record(geo(), false)), PopupLayout::Regular);
        assert_eq!(PopupLayout::for_record(&record(geo(), true)), PopupLayout::Local);
        assert_eq!(PopupLayout::for_record(&record(not_found(), false)), PopupLayout::NotFound);
        assert_eq!(PopupLayout::NotFound.as_ref(), "not-found");
    }

    #[test]
    fn test_toolbar_toggle_only_without_resolved_ip() {
        assert_eq!(
            Toolbar::for_record(&record(not_found(), false)).local_toggle,
            Some(LocalToggle::MarkLocal)
        );
        assert_eq!(
            Toolbar::for_record(&record(not_found(), true)).local_toggle,
            Some(LocalToggle::UnmarkLocal)
        );
        assert_eq!(
            Toolbar::for_record(&record(RecordData::Bare { ip: None }, true)).local_toggle,
            Some(LocalToggle::UnmarkLocal)
        );
    }

    #[test]
    fn test_toolbar_hides_toggle_once_an_ip_is_known() {
        assert_eq!(Toolbar::for_record(&record(geo(), false)).local_toggle, None);
        assert_eq!(
            Toolbar::for_record(&record(not_found_at("1.2.3.4"), false)).local_toggle,
            None
        );
        // Resolved to a private address: unmarking would land on the same result
        let private = RecordData::Bare {
            ip: Some("10.0.0.0".into()),
        };
        assert_eq!(Toolbar::for_record(&record(private, true)).local_toggle, None);
    }

    #[test]
    fn test_display_regular() {
        let view = PopupView::new("proper.site.ua".into(), record(geo(), false), None);
        assert_eq!(
            view.to_string(),
            "proper.site.ua\nUkraine\nPostal code: 08150\nIP: 9.9.9.9\n[reload]\n"
        );
    }

    #[test]
    fn test_display_not_found_offers_marking() {
        let view = PopupView::new("gone.example".into(), record(not_found(), false), None);
        let text = view.to_string();
        assert!(text.contains("No location known for gone.example"));
        assert!(text.ends_with("[reload] [mark-local]\n"));
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(PopupView::empty().to_string(), "Nothing to locate on this page\n");
    }
}
