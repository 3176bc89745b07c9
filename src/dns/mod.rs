//! DNS resolution.
//!
//! This module turns a domain into a single IP address:
//! - Native resolution through an optional [`NativeResolve`] capability
//!   (`hickory-resolver` in the native shell, IPv4 only)
//! - DNS-over-HTTPS JSON fallback (A records)
//!
//! Resolution never fails: every error path yields "no address".

mod doh;
mod native;
mod resolution;

// Re-export public API
pub use doh::doh_lookup;
pub use native::{NativeResolve, SystemResolver};
pub use resolution::Resolver;
