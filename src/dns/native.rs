//! Native (platform) DNS resolution.
//!
//! The native resolver is an optional capability: embedders that have one
//! provide a [`NativeResolve`] implementation, everything else falls back to
//! DNS-over-HTTPS.

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::{Error, Result};
use futures::future::BoxFuture;
use hickory_resolver::TokioAsyncResolver;

/// A platform resolver capability.
pub trait NativeResolve: Send + Sync {
    /// Resolves `domain` to its IPv4 addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails for any reason. Callers treat every
    /// error as "fall back".
    fn resolve<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<Vec<IpAddr>, Error>>;
}

/// System resolver backed by `hickory-resolver`.
///
/// Build the inner resolver with [`crate::initialization::init_resolver`], which
/// disables IPv6 lookups.
#[derive(Clone)]
pub struct SystemResolver {
    resolver: Arc<TokioAsyncResolver>,
}

impl SystemResolver {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

impl NativeResolve for SystemResolver {
    fn resolve<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<Vec<IpAddr>, Error>> {
        Box::pin(async move {
            let response = self.resolver.lookup_ip(domain).await.map_err(Error::new)?;
            Ok(response.iter().collect())
        })
    }
}
