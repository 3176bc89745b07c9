//! Geolocation lookup over HTTP.
//!
//! This module resolves a domain and asks the geolocation service where the
//! resulting address is. Every failure is folded into [`LookupResult::Error`].

use reqwest::header::ACCEPT;

use super::types::{error_from_body, geo_from_body, LookupResult};
use crate::config::{CLIENT_VERSION, CLIENT_VERSION_HEADER};
use crate::dns::Resolver;
use crate::domain::is_local_address;
use crate::error_handling::LookupFailure;
use crate::models::ErrorData;

/// Resolves domains and geolocates their addresses.
#[derive(Clone)]
pub struct GeoLookup {
    resolver: Resolver,
    client: reqwest::Client,
    endpoint: String,
}

impl GeoLookup {
    /// Creates a lookup against the geolocation service at `endpoint`.
    pub fn new(resolver: Resolver, client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            resolver,
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Looks up the location of `domain`.
    ///
    /// A domain that resolves to a private address returns
    /// [`LookupResult::Local`] without contacting the geolocation service, so a
    /// local DNS server answering for a public-looking name is not leaked.
    /// When resolution fails the service is asked about the domain itself.
    pub async fn lookup(&self, domain: &str) -> LookupResult {
        let ip = self.resolver.resolve(domain).await;
        if let Some(ip) = ip.as_deref() {
            if is_local_address(ip) {
                log::info!("{domain} resolved to local address {ip}, skipping geolocation");
                return LookupResult::Local { ip: ip.to_string() };
            }
        }

        let target = ip.as_deref().unwrap_or(domain);
        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), target);
        log::info!("Geolocating {domain} via {url}");

        let response = match self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(CLIENT_VERSION_HEADER, CLIENT_VERSION)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} for {domain}: {e}", LookupFailure::Network);
                return LookupResult::Error(ErrorData {
                    error: e.to_string(),
                    status: None,
                    ip: None,
                });
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{} for {domain}: {e}", LookupFailure::Network);
                return LookupResult::Error(ErrorData {
                    error: e.to_string(),
                    status: Some(status.as_u16()),
                    ip: None,
                });
            }
        };

        if !status.is_success() {
            let error = error_from_body(&text, status.as_u16());
            log::warn!(
                "{} for {domain}: {} {}",
                LookupFailure::from_status(error.status),
                status,
                error.error
            );
            return LookupResult::Error(error);
        }

        match serde_json::from_str(&text).map(geo_from_body) {
            Ok(Some(geo)) => LookupResult::Geo(geo),
            Ok(None) => {
                log::warn!("{} for {domain}: {text}", LookupFailure::MalformedBody);
                LookupResult::Error(error_from_body(&text, status.as_u16()))
            }
            Err(e) => {
                log::warn!("{} for {domain}: {e}", LookupFailure::MalformedBody);
                LookupResult::Error(ErrorData {
                    error: format!("Invalid geolocation response: {e}"),
                    status: Some(status.as_u16()),
                    ip: None,
                })
            }
        }
    }
}
