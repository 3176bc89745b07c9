//! GeoIP lookup over HTTP.
//!
//! This module resolves a domain to an address and asks a geolocation service
//! where that address is. Private addresses short-circuit to a local result;
//! network, HTTP, and parse failures become error data with an optional status.

mod lookup;
mod types;

// Re-export public API
pub use lookup::GeoLookup;
pub use types::LookupResult;
