//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::constants::{
    DEFAULT_DOH_ENDPOINT, DEFAULT_GEO_ENDPOINT, DEFAULT_STORE_PATH, DEFAULT_STORE_QUOTA_BYTES,
    HTTP_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration.
///
/// Usable programmatically through [`Default`], and flattened into the CLI by
/// the binary.
///
/// # Examples
///
/// ```no_run
/// use domain_flag::Config;
///
/// let config = Config {
///     geo_endpoint: "http://127.0.0.1:8080".to_string(),
///     native_resolver: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// DNS-over-HTTPS JSON endpoint used when the native resolver is disabled or fails
    #[arg(long, default_value = DEFAULT_DOH_ENDPOINT)]
    pub doh_endpoint: String,

    /// Geolocation service base URL
    #[arg(long, default_value = DEFAULT_GEO_ENDPOINT)]
    pub geo_endpoint: String,

    /// Use the system resolver before falling back to DNS-over-HTTPS
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub native_resolver: bool,

    /// Key-value store file
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    pub store_path: PathBuf,

    /// Key-value store capacity in bytes
    #[arg(long, default_value_t = DEFAULT_STORE_QUOTA_BYTES)]
    pub store_quota_bytes: usize,

    /// Directory containing the `img/` icon assets
    #[arg(long, default_value = ".")]
    pub assets_dir: PathBuf,

    /// Whether the canvas supports blur filters (glyph fallback otherwise)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub canvas_filter: bool,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            doh_endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            geo_endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
            native_resolver: true,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            store_quota_bytes: DEFAULT_STORE_QUOTA_BYTES,
            assets_dir: PathBuf::from("."),
            canvas_filter: true,
            timeout_seconds: HTTP_TIMEOUT_SECS,
        }
    }
}
