//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, CLIENT_VERSION};
use crate::error_handling::InitializationError;

/// Builds the HTTP client shared by DNS-over-HTTPS and geolocation requests.
///
/// Requests carry no cookies and identify as `domain_flag/<version>`.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the TLS backend cannot be
/// initialized.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(format!("domain_flag/{CLIENT_VERSION}"))
        .build()?;
    Ok(client)
}
