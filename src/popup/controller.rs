//! Popup interactions.
//!
//! The popup shares the background resolution path: every view is built
//! from what [`FlagController::set_flag`] returns.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::view::{Animation, PopupView};
use crate::config::{ANIMATION_DURATION, ANIMATION_ODDS, DONATION_URL};
use crate::domain::registrable_domain;
use crate::error_handling::FlagError;
use crate::flag::FlagController;
use crate::models::{DomainRecord, RecordData};
use crate::platform::{Tab, TabsApi};

/// Where the popup is displayed.
pub trait PopupSurface: Send + Sync {
    /// Toggles the optimistic loading treatment while a reload runs.
    fn set_loading(&self, loading: bool);

    fn render(&self, view: &PopupView);
}

/// Outcome of the reload button.
#[derive(Debug, Clone, PartialEq)]
pub enum ReloadOutcome {
    Reloaded(PopupView),
    /// The command modifier was held; the donation page was opened instead.
    OpenedDonation,
}

/// Popup controller.
pub struct PopupController {
    flags: Arc<FlagController>,
    tabs: Arc<dyn TabsApi>,
    surface: Arc<dyn PopupSurface>,
    rng: Mutex<StdRng>,
}

impl PopupController {
    pub fn new(
        flags: Arc<FlagController>,
        tabs: Arc<dyn TabsApi>,
        surface: Arc<dyn PopupSurface>,
    ) -> Self {
        Self::with_rng(flags, tabs, surface, StdRng::from_os_rng())
    }

    /// Uses a fixed random source for the decorative animation.
    pub fn with_rng(
        flags: Arc<FlagController>,
        tabs: Arc<dyn TabsApi>,
        surface: Arc<dyn PopupSurface>,
        rng: StdRng,
    ) -> Self {
        Self {
            flags,
            tabs,
            surface,
            rng: Mutex::new(rng),
        }
    }

    /// Opens the popup for the active tab.
    pub async fn open(&self) -> Result<PopupView, FlagError> {
        let Some(tab) = self.tabs.query_active().await? else {
            return Ok(self.show(PopupView::empty()));
        };
        let record = self.flags.set_flag(&tab, false).await?;
        let animation = self.roll_animation();
        Ok(self.show(view_for(&tab, record, animation)))
    }

    /// Reloads the active tab's record, or opens the donation page when
    /// `modifier` is held.
    pub async fn reload(&self, modifier: bool) -> Result<ReloadOutcome, FlagError> {
        if modifier {
            self.tabs.create(DONATION_URL).await?;
            return Ok(ReloadOutcome::OpenedDonation);
        }
        let Some(tab) = self.tabs.query_active().await? else {
            return Ok(ReloadOutcome::Reloaded(self.show(PopupView::empty())));
        };

        self.surface.set_loading(true);
        let result = self.flags.set_flag(&tab, true).await;
        self.surface.set_loading(false);

        Ok(ReloadOutcome::Reloaded(
            self.show(view_for(&tab, result?, None)),
        ))
    }

    /// Flips the local override of the active tab's domain.
    ///
    /// Unmarking forces a new lookup right away since the stored record may
    /// hold no geo data.
    pub async fn toggle_local(&self) -> Result<PopupView, FlagError> {
        let Some(tab) = self.tabs.query_active().await? else {
            return Ok(self.show(PopupView::empty()));
        };
        let Some(domain) = registrable_domain(tab.url.as_deref()) else {
            return Ok(self.show(PopupView::empty()));
        };

        let cache = self.flags.cache();
        let mut record = match cache.get_domain(&domain).await? {
            Some(record) => record,
            None => DomainRecord {
                fetched_at: Some(self.flags.clock().now_millis()),
                is_local: false,
                data: RecordData::Bare { ip: None },
                icon: None,
            },
        };
        record.is_local = !record.is_local;
        log::info!(
            "{} {domain} as local",
            if record.is_local { "Marking" } else { "Unmarking" }
        );
        cache.save_domain(&domain, &record).await?;

        let refetch = !record.is_local;
        let record = self.flags.set_flag(&tab, refetch).await?;
        Ok(self.show(view_for(&tab, record, None)))
    }

    fn roll_animation(&self) -> Option<Animation> {
        let mut rng = match self.rng.lock() {
            Ok(rng) => rng,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.random_ratio(1, ANIMATION_ODDS).then_some(Animation {
            duration: ANIMATION_DURATION,
        })
    }

    fn show(&self, view: PopupView) -> PopupView {
        self.surface.render(&view);
        view
    }
}

fn view_for(tab: &Tab, record: Option<DomainRecord>, animation: Option<Animation>) -> PopupView {
    match (registrable_domain(tab.url.as_deref()), record) {
        (Some(domain), Some(record)) => PopupView::new(domain, record, animation),
        _ => PopupView::empty(),
    }
}
