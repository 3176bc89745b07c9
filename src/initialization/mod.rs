//! Shared resource setup for the native shell.
//!
//! This module provides:
//! - Logger setup ([`init_logger_with`])
//! - The HTTP client ([`init_client`])
//! - The hickory system resolver ([`init_resolver`])
//! - The raster canvas factory ([`init_canvas_factory`])

mod canvas;
mod client;
mod logger;
mod resolver;

// Re-export public API
pub use canvas::init_canvas_factory;
pub use client::init_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;
