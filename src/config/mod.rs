//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, freshness thresholds, canvas geometry)
//! - Configuration types and CLI option parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
