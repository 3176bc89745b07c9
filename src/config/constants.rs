//! Configuration constants.
//!
//! This module defines the constants used throughout the crate: remote
//! endpoints, freshness thresholds, canvas geometry, and icon asset paths.

use std::time::Duration;

// Remote endpoints
/// Public DNS-over-HTTPS JSON endpoint used when no native resolver is available.
pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";
/// Geolocation service base URL. Queried as `<endpoint>/<ip-or-domain>`.
pub const DEFAULT_GEO_ENDPOINT: &str = "https://geo.domainflag.net";
/// DNS record type for A records in DoH queries and answers.
pub const DNS_TYPE_A: u16 = 1;
/// Header carrying the client version on geolocation requests.
pub const CLIENT_VERSION_HEADER: &str = "x-client-version";
/// Client version sent with every geolocation request.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Default HTTP timeout for the native shell. The core adds none of its own.
pub const HTTP_TIMEOUT_SECS: u64 = 30;
/// Native DNS resolver timeout in seconds.
pub const DNS_TIMEOUT_SECS: u64 = 5;

// Freshness thresholds
/// Retry window for records whose lookup failed before any HTTP response.
pub const NETWORK_ERROR_RETRY_AFTER: Duration = Duration::from_secs(60);
/// Retry window for records whose lookup answered 404.
pub const NOT_FOUND_RETRY_AFTER: Duration = Duration::from_secs(24 * 60 * 60);
/// Absolute staleness ceiling for any non-local record.
pub const MAX_RECORD_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// Canvas geometry
/// Edge length of the square icon canvas in pixels.
pub const CANVAS_SIZE: u32 = 64;
/// Fixed upscale factor for flag assets.
pub const FLAG_SCALE: f64 = 4.0;
/// Path segment identifying flag assets.
pub const FLAGS_SEGMENT: &str = "flags";
/// Font used for status glyph overlays.
pub const GLYPH_FONT: &str = "24px serif";
/// Font size in pixels for status glyph overlays.
pub const GLYPH_FONT_PX: f64 = 24.0;
/// Suffix appended to glyphs on canvases without filter support, so emoji are
/// not clipped at the baseline.
pub const GLYPH_DESCENDER_PAD: &str = " q";
/// Default Gaussian blur radius for the loading treatment.
pub const DEFAULT_BLUR_RADIUS: f32 = 2.0;

// Icon assets
/// Icon drawn when no flag is known for a domain.
pub const DEFAULT_ICON_PATH: &str = "/img/icon.png";
/// Icon drawn for local resources.
pub const LOCAL_ICON_PATH: &str = "/img/local.png";
/// Directory holding per-country flag assets.
pub const FLAGS_DIR: &str = "/img/flags";
/// Directory holding status glyph sprites for the raster canvas.
pub const GLYPHS_DIR: &str = "img/glyphs";

// Status glyphs and titles
/// Glyph drawn over the last known icon while a lookup is in flight.
pub const LOADING_GLYPH: &str = "⏳";
/// Glyph drawn over the default icon when a lookup failed.
pub const ERROR_GLYPH: &str = "❌";
/// Action title for tabs without a resolvable domain.
pub const NO_DOMAIN_TITLE: &str = "😴";
/// Separator between country, region, and city in the action title.
pub const TITLE_SEPARATOR: &str = " → ";

// Popup
/// Link opened by the reload button when the command modifier is held.
pub const DONATION_URL: &str = "https://www.buymeacoffee.com/domainflag";
/// Denominator of the chance that the toolbar animation plays on popup open.
pub const ANIMATION_ODDS: u32 = 4;
/// Duration of the decorative toolbar animation.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(1500);

// Storage
/// Default file for the native shell's key-value store.
pub const DEFAULT_STORE_PATH: &str = "./domain_flag.json";
/// Default capacity of the native shell's key-value store in bytes.
/// Matches the browser's local storage quota.
pub const DEFAULT_STORE_QUOTA_BYTES: usize = 5 * 1024 * 1024;
