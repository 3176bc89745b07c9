//! Tab event handlers.
//!
//! Each handler runs `set_flag` for the affected tab and logs any failure
//! instead of returning it, so one bad event never takes the listeners down.

use std::sync::Arc;

use futures::future::join_all;

use super::controller::FlagController;
use crate::platform::{Tab, TabChangeInfo, TabId, TabStatus, TabsApi};

/// Platform event entry points.
#[derive(Clone)]
pub struct EventHandlers {
    controller: Arc<FlagController>,
    tabs: Arc<dyn TabsApi>,
}

impl EventHandlers {
    pub fn new(controller: Arc<FlagController>, tabs: Arc<dyn TabsApi>) -> Self {
        Self { controller, tabs }
    }

    /// A tab navigated or changed loading status.
    ///
    /// Only URL changes and completed loads update the flag.
    pub async fn on_tab_updated(&self, tab_id: TabId, change: &TabChangeInfo, tab: &Tab) {
        if change.url.is_none() && change.status != Some(TabStatus::Complete) {
            log::trace!("Ignoring update of tab {tab_id}: {change:?}");
            return;
        }
        self.dispatch(tab).await;
    }

    /// The user switched to another tab.
    pub async fn on_tab_activated(&self, tab_id: TabId) {
        match self.tabs.get(tab_id).await {
            Ok(Some(tab)) => self.dispatch(&tab).await,
            Ok(None) => log::debug!("Activated tab {tab_id} is gone"),
            Err(e) => log::warn!("Failed to read activated tab {tab_id}: {e}"),
        }
    }

    /// The extension was installed or updated; flag every open tab.
    pub async fn on_installed(&self) {
        let tabs = match self.tabs.query_all().await {
            Ok(tabs) => tabs,
            Err(e) => {
                log::warn!("Failed to list tabs after install: {e}");
                return;
            }
        };
        log::info!("Setting flags for {} open tabs", tabs.len());
        join_all(tabs.iter().map(|tab| self.dispatch(tab))).await;
    }

    async fn dispatch(&self, tab: &Tab) {
        if let Err(e) = self.controller.set_flag(tab, false).await {
            log::warn!("Failed to set flag for tab {}: {e}", tab.id);
        }
    }
}
