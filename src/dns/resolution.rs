//! Domain to IP address resolution.
//!
//! This module resolves a domain with the native resolver when one is
//! configured and falls back to DNS-over-HTTPS otherwise.

use std::sync::Arc;

use super::doh::doh_lookup;
use super::native::NativeResolve;

/// Resolves domains to a single IPv4 address.
#[derive(Clone)]
pub struct Resolver {
    native: Option<Arc<dyn NativeResolve>>,
    client: reqwest::Client,
    doh_endpoint: String,
}

impl Resolver {
    /// Creates a resolver that only uses DNS-over-HTTPS.
    pub fn new(client: reqwest::Client, doh_endpoint: impl Into<String>) -> Self {
        Self {
            native: None,
            client,
            doh_endpoint: doh_endpoint.into(),
        }
    }

    /// Adds a native resolver, tried before DNS-over-HTTPS.
    pub fn with_native(mut self, native: Arc<dyn NativeResolve>) -> Self {
        self.native = Some(native);
        self
    }

    /// The native resolver capability, if available.
    fn native(&self) -> Option<&dyn NativeResolve> {
        self.native.as_deref()
    }

    /// Resolves a domain to an IP address.
    ///
    /// # Arguments
    ///
    /// * `domain` - The host name to resolve
    ///
    /// # Returns
    ///
    /// The first address from the native resolver, or the first A record from
    /// DNS-over-HTTPS when the native resolver is missing, fails, or returns no
    /// addresses. `None` if both paths come up empty. Never fails.
    pub async fn resolve(&self, domain: &str) -> Option<String> {
        if let Some(native) = self.native() {
            match native.resolve(domain).await {
                Ok(addrs) => match addrs.first() {
                    Some(ip) => {
                        log::debug!("Native resolver: {domain} -> {ip}");
                        return Some(ip.to_string());
                    }
                    None => log::debug!("Native resolver returned no addresses for {domain}"),
                },
                Err(e) => log::debug!("Native resolver failed for {domain}: {e}"),
            }
        }

        let ip = doh_lookup(&self.client, &self.doh_endpoint, domain).await;
        log::debug!("DoH resolver: {domain} -> {ip:?}");
        ip
    }
}
