//! domain_flag library: locate the server behind a tab and draw its flag
//!
//! The core pipeline takes a tab URL to a page action icon and title:
//! classify the domain, consult the per-domain cache and its freshness
//! policy, resolve and geolocate when needed, persist the result, and render
//! a 64×64 icon. Every platform collaborator (key-value store, page action,
//! tabs, canvas, assets, clock, native resolver) is an injected trait object.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use domain_flag::{
//!     DomainCache, FlagController, GeoLookup, IconRenderer, MemoryStore, Resolver,
//!     SystemClock, Tab,
//! };
//! use domain_flag::icon::{DirAssets, GlyphSet, ImageDecoder, RasterCanvasFactory};
//! use domain_flag::shell::IconFileAction;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//! let resolver = Resolver::new(client.clone(), "https://dns.google/resolve");
//! let lookup = GeoLookup::new(resolver, client, "https://geo.domainflag.net");
//! let action = Arc::new(IconFileAction::new(Some("icon.png".into())));
//! let renderer = IconRenderer::new(
//!     Arc::new(DirAssets::new(".")),
//!     Arc::new(ImageDecoder),
//!     Arc::new(RasterCanvasFactory::new(GlyphSet::new(), true)),
//!     action.clone(),
//! );
//! let flags = FlagController::new(
//!     DomainCache::new(Arc::new(MemoryStore::new())),
//!     lookup,
//!     renderer,
//!     action.clone(),
//!     Arc::new(SystemClock),
//! );
//!
//! flags.set_flag(&Tab::new(1, "https://example.com/"), false).await?;
//! println!("{}", action.title().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod config;
mod dns;
mod domain;
mod error_handling;
mod flag;
pub mod freshness;
mod geoip;
pub mod icon;
pub mod initialization;
mod models;
pub mod platform;
mod popup;
pub mod shell;
mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use dns::{doh_lookup, NativeResolve, Resolver, SystemResolver};
pub use domain::{is_local_address, registrable_domain};
pub use error_handling::{
    ActionError, FlagError, InitializationError, LookupFailure, RenderError, StoreError,
};
pub use flag::{flag_path, location_title, EventHandlers, FlagController, PageActionState};
pub use geoip::{GeoLookup, LookupResult};
pub use icon::IconRenderer;
pub use models::{DomainRecord, ErrorData, GeoData, RecordData, RecordKind};
pub use platform::{ActionApi, Clock, SystemClock, Tab, TabChangeInfo, TabId, TabStatus, TabsApi};
pub use popup::{
    Animation, LocalToggle, PopupController, PopupLayout, PopupSurface, PopupView, ReloadOutcome,
    Toolbar,
};
pub use storage::{DomainCache, JsonFileStore, KeyValueStore, MemoryStore};
