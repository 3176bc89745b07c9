//! Error handling.
//!
//! This module provides the error types for each concern:
//! - **Initialization**: logger, HTTP client, glyph sprite setup
//! - **Store**: key-value persistence, including quota exhaustion
//! - **Render**: canvas acquisition, asset decoding, icon commit
//! - **Flag**: the orchestration layer, wrapping the above
//!
//! Lookup failures (network, HTTP status) are not errors at this level: they are
//! recorded in the domain record and categorized with [`LookupFailure`].

mod types;

// Re-export public API
pub use types::{
    ActionError, FlagError, InitializationError, LookupFailure, RenderError, StoreError,
};
