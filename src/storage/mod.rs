//! Domain record persistence.
//!
//! This module provides:
//! - The [`KeyValueStore`] abstraction the core persists through
//! - [`MemoryStore`] and [`JsonFileStore`] implementations
//! - [`DomainCache`], the per-domain record API with quota recovery

mod cache;
mod file;
mod store;

// Re-export public API
pub use cache::DomainCache;
pub use file::JsonFileStore;
pub use store::{KeyValueStore, MemoryStore};

#[cfg(test)]
mod tests;
