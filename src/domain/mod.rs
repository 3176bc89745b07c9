//! Domain classification utilities.
//!
//! This module decides whether an address or host name refers to a local
//! resource, and extracts the host of a tab URL.
//!
//! Key functions:
//! - `is_local_address()` - Private-range IPv4 or `localhost` check
//! - `registrable_domain()` - Host name of an `http`, `https`, or `ftp` URL

/// URL schemes whose host is looked up.
const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Returns true if `ip_or_host` names a local resource.
///
/// Local means `localhost`, the all-zero address `0.0.0.0`, or an IPv4 address in
/// `127.0.0.0/8`, `10.0.0.0/8`, `172.16.0.0/12`, or `192.168.0.0/16`.
///
/// Anything that is not a dotted quad of four integer segments returns false.
/// Only the leading segments that select a range are compared, and nothing is
/// range-checked: `127.999.0.1` and `10.-1.0.0` are both local.
pub fn is_local_address(ip_or_host: &str) -> bool {
    if ip_or_host.is_empty() {
        return false;
    }
    if ip_or_host == "localhost" {
        return true;
    }

    let segments: Vec<&str> = ip_or_host.split('.').collect();
    if segments.len() != 4 {
        return false;
    }
    let mut octets = [0i64; 4];
    for (octet, segment) in octets.iter_mut().zip(&segments) {
        match segment.parse::<i64>() {
            Ok(value) => *octet = value,
            Err(_) => return false,
        }
    }

    match octets {
        [0, 0, 0, 0] => true,
        [127, _, _, _] => true,
        [10, _, _, _] => true,
        [172, second, _, _] => (16..=31).contains(&second),
        [192, 168, _, _] => true,
        _ => false,
    }
}

/// Extracts the host name from a tab URL.
///
/// # Arguments
///
/// * `url` - The URL of the tab, if any
///
/// # Returns
///
/// The host (e.g., "www.example.com" from "https://www.example.com/path") for
/// `http`, `https`, and `ftp` URLs. `None` for other schemes, empty input, and
/// anything that does not parse as a URL.
pub fn registrable_domain(url: Option<&str>) -> Option<String> {
    let url = url.filter(|u| !u.is_empty())?;
    let parsed = match url::Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug!("Ignoring unparseable URL {url}: {e}");
            return None;
        }
    };
    if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
        return None;
    }
    parsed.host_str().map(str::to_string)
}
