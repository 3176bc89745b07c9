//! Error type definitions.
//!
//! This module defines the error types used throughout the crate. Recoverable
//! network failures never show up here: they are folded into the persisted
//! [`crate::models::ErrorData`] so the freshness policy can schedule retries.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error opening the glyph sprites for the raster canvas.
    #[error("Glyph initialization error: {0}")]
    GlyphError(#[from] RenderError),
}

/// Error types for key-value store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store refused the write because it is full.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded {
        /// Size of the store after the rejected write.
        needed: usize,
        /// Configured capacity.
        quota: usize,
    },

    /// Filesystem error from a file-backed store.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or the store document could not be decoded.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if this error signals a capacity failure that eviction may fix.
    pub fn is_quota(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. })
    }
}

/// Error types for icon rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The drawing surface could not be acquired. Indicates a broken host, not a
    /// runtime condition worth retrying.
    #[error("Failed to acquire a {size}x{size} drawing surface: {reason}")]
    CanvasUnavailable {
        /// Requested edge length in pixels.
        size: u32,
        /// Backend-provided reason.
        reason: String,
    },

    /// No asset exists at the requested path.
    #[error("Icon asset not found: {0}")]
    AssetNotFound(String),

    /// The asset bytes could not be decoded as an image.
    #[error("Failed to decode icon asset {path}: {reason}")]
    Decode {
        /// Asset path.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// Filesystem error while reading an asset.
    #[error("Icon asset I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The platform rejected the rendered icon.
    #[error("Failed to set tab icon: {0}")]
    Action(#[from] ActionError),
}

/// Error returned by the platform action and tabs APIs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ActionError(pub String);

/// Error types for the flag controller.
#[derive(Error, Debug)]
pub enum FlagError {
    /// Persisting or reading a domain record failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Drawing or committing the page action icon failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The action API rejected a title or enable/disable call.
    #[error("Action API error: {0}")]
    Action(#[from] ActionError),

    /// A record reached the renderer without a derivable tag. This is a
    /// programming error, never a network condition.
    #[error("Unexpected record state: {0}")]
    UnexpectedState(String),
}

/// Categories of lookup failure recorded in a domain record.
///
/// Used for log output and statistics; the persisted record only carries the
/// raw message and optional HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum LookupFailure {
    /// The geolocation request never produced a response.
    Network,
    /// The geolocation service answered 404.
    NotFound,
    /// The geolocation service answered with another non-OK status.
    HttpStatus,
    /// The geolocation service answered OK with a body that is not geo data.
    MalformedBody,
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LookupFailure {
    /// Returns a human-readable string representation of the failure.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupFailure::Network => "Network error",
            LookupFailure::NotFound => "Not Found (404)",
            LookupFailure::HttpStatus => "HTTP status error",
            LookupFailure::MalformedBody => "Malformed response body",
        }
    }

    /// Categorizes a failure by its optional HTTP status.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            None => LookupFailure::Network,
            Some(404) => LookupFailure::NotFound,
            Some(_) => LookupFailure::HttpStatus,
        }
    }
}
