//! The `set_flag` pipeline.
//!
//! One invocation takes a tab from its URL to an updated page action:
//! classify the domain, consult the cache and the freshness policy, look the
//! domain up when needed, persist, and redraw.

use std::sync::Arc;

use super::page_action::{flag_path, PageActionState};
use crate::config::{
    DEFAULT_ICON_PATH, ERROR_GLYPH, LOADING_GLYPH, LOCAL_ICON_PATH, NO_DOMAIN_TITLE,
};
use crate::domain::{is_local_address, registrable_domain};
use crate::error_handling::FlagError;
use crate::freshness::{self, Freshness};
use crate::geoip::GeoLookup;
use crate::icon::IconRenderer;
use crate::models::DomainRecord;
use crate::platform::{ActionApi, Clock, Tab, TabId};
use crate::storage::DomainCache;

/// Drives the page action of a tab from its domain record.
///
/// Concurrent calls for the same domain are not coordinated; the last write
/// to the cache wins.
#[derive(Clone)]
pub struct FlagController {
    cache: DomainCache,
    lookup: GeoLookup,
    renderer: IconRenderer,
    action: Arc<dyn ActionApi>,
    clock: Arc<dyn Clock>,
}

impl FlagController {
    pub fn new(
        cache: DomainCache,
        lookup: GeoLookup,
        renderer: IconRenderer,
        action: Arc<dyn ActionApi>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            lookup,
            renderer,
            action,
            clock,
        }
    }

    pub fn cache(&self) -> &DomainCache {
        &self.cache
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Updates the page action of `tab` and returns the record it reflects.
    ///
    /// Returns `Ok(None)` when the tab's URL has no domain to locate, in which
    /// case the action is disabled.
    ///
    /// # Errors
    ///
    /// Storage, rendering and action failures propagate. Lookup failures do
    /// not: they are persisted as error records.
    pub async fn set_flag(&self, tab: &Tab, refetch: bool) -> Result<Option<DomainRecord>, FlagError> {
        let Some(domain) = registrable_domain(tab.url.as_deref()) else {
            self.action.disable(tab.id).await?;
            self.action.set_title(tab.id, NO_DOMAIN_TITLE).await?;
            return Ok(None);
        };
        self.action.enable(tab.id).await?;

        let now = self.clock.now_millis();
        if is_local_address(&domain) {
            log::debug!("{domain} is local by name");
            let record = DomainRecord::local(now);
            self.render_state(tab.id, &domain, &PageActionState::Local)
                .await?;
            self.cache.save_domain(&domain, &record).await?;
            return Ok(Some(record));
        }

        let existing = self.cache.get_domain(&domain).await?;
        let record = match (freshness::evaluate(existing.as_ref(), refetch, now), existing) {
            (Freshness::Fresh, Some(record)) => {
                log::debug!("Serving cached record for {domain}");
                record
            }
            (freshness, existing) => {
                log::debug!("Looking up {domain}: {freshness:?}");
                self.render_state(tab.id, &domain, &PageActionState::Loading)
                    .await?;
                let is_local = existing.is_some_and(|record| record.is_local);
                let record = self.lookup.lookup(&domain).await.into_record(now, is_local);
                self.cache.save_domain(&domain, &record).await?;
                record
            }
        };

        self.render_record(tab.id, &domain, &record).await?;
        Ok(Some(record))
    }

    async fn render_record(
        &self,
        tab_id: TabId,
        domain: &str,
        record: &DomainRecord,
    ) -> Result<(), FlagError> {
        let state = PageActionState::from_record(domain, record)?;
        let drawn = self.render_state(tab_id, domain, &state).await?;
        if matches!(state, PageActionState::Geo { .. }) && record.icon.as_deref() != Some(drawn.as_str()) {
            self.cache.save_domain_icon(domain, &drawn).await?;
        }
        Ok(())
    }

    /// Draws and commits the icon for `state`, then sets the title. Returns
    /// the base asset that was drawn.
    async fn render_state(
        &self,
        tab_id: TabId,
        domain: &str,
        state: &PageActionState,
    ) -> Result<String, FlagError> {
        let mut drawing = self.renderer.begin()?;
        let drawn = match state {
            PageActionState::Local => {
                drawing.draw_upscaled(LOCAL_ICON_PATH).await?;
                LOCAL_ICON_PATH.to_string()
            }
            PageActionState::Loading => {
                let icon = self.cache.get_domain_icon(domain).await?;
                if drawing.supports_filter() {
                    drawing.draw_upscaled_with_blur(&icon).await?;
                } else {
                    drawing.draw_upscaled_with_glyph(&icon, LOADING_GLYPH).await?;
                }
                icon
            }
            PageActionState::Error { .. } => {
                drawing
                    .draw_upscaled_with_glyph(DEFAULT_ICON_PATH, ERROR_GLYPH)
                    .await?;
                DEFAULT_ICON_PATH.to_string()
            }
            PageActionState::Geo { country_code, .. } => {
                let drawn_flag = match flag_path(country_code) {
                    Some(flag) => match drawing.draw_upscaled(&flag).await {
                        Ok(_) => Some(flag),
                        Err(e) => {
                            log::warn!("Cannot draw {flag} for {domain}: {e}");
                            None
                        }
                    },
                    None => {
                        log::warn!("Country code {country_code:?} for {domain} names no flag");
                        None
                    }
                };
                match drawn_flag {
                    Some(flag) => flag,
                    None => {
                        drawing.draw_upscaled(DEFAULT_ICON_PATH).await?;
                        DEFAULT_ICON_PATH.to_string()
                    }
                }
            }
        };
        drawing.commit_to_tab_icon(tab_id).await?;
        self.action.set_title(tab_id, &state.title(domain)).await?;
        log::debug!("Tab {tab_id} shows {} for {domain}", state.as_ref());
        Ok(drawn)
    }
}
