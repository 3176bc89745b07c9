//! Host platform capabilities.
//!
//! The core never talks to a browser directly. The page action, tab queries
//! and the wall clock are reached through these traits so that the extension
//! shell, the CLI and tests can each supply their own.

use futures::future::BoxFuture;

use crate::error_handling::ActionError;
use crate::icon::ImageData;

/// Browser tab identifier.
pub type TabId = i64;

/// The parts of a tab the core reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub url: Option<String>,
}

impl Tab {
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: Some(url.into()),
        }
    }
}

/// Loading status reported with a tab update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
}

/// What changed in a tab update event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabChangeInfo {
    pub url: Option<String>,
    pub status: Option<TabStatus>,
}

/// Per-tab toolbar button.
pub trait ActionApi: Send + Sync {
    fn set_title<'a>(&'a self, tab_id: TabId, title: &'a str)
        -> BoxFuture<'a, Result<(), ActionError>>;

    /// Sets the icon from raw pixels; `image.width` is the size key.
    fn set_icon_image(&self, tab_id: TabId, image: ImageData)
        -> BoxFuture<'_, Result<(), ActionError>>;

    fn enable(&self, tab_id: TabId) -> BoxFuture<'_, Result<(), ActionError>>;

    fn disable(&self, tab_id: TabId) -> BoxFuture<'_, Result<(), ActionError>>;
}

/// Tab queries.
pub trait TabsApi: Send + Sync {
    fn get(&self, tab_id: TabId) -> BoxFuture<'_, Result<Option<Tab>, ActionError>>;

    /// The active tab of the current window, if any.
    fn query_active(&self) -> BoxFuture<'_, Result<Option<Tab>, ActionError>>;

    fn query_all(&self) -> BoxFuture<'_, Result<Vec<Tab>, ActionError>>;

    /// Opens `url` in a new tab.
    fn create<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), ActionError>>;
}

/// Wall clock in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
