//! Native embedding shell.
//!
//! Plays the browser's part for the command line: a single tab holding the
//! URL under inspection, a page action that remembers its title and writes
//! its icon to a PNG file, and a popup surface that logs its state. [`Shell`]
//! wires these to the file store, the system resolver and the raster canvas.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use futures::future::BoxFuture;

use crate::config::Config;
use crate::dns::{Resolver, SystemResolver};
use crate::error_handling::ActionError;
use crate::flag::FlagController;
use crate::geoip::GeoLookup;
use crate::icon::{encode_png, DirAssets, IconRenderer, ImageData, ImageDecoder};
use crate::initialization::{init_canvas_factory, init_client, init_resolver};
use crate::platform::{ActionApi, SystemClock, Tab, TabId, TabsApi};
use crate::popup::{PopupController, PopupSurface, PopupView};
use crate::storage::{DomainCache, JsonFileStore};

/// Tab id of the single shell tab.
pub const SHELL_TAB_ID: TabId = 1;

#[derive(Debug, Default)]
struct ActionState {
    title: Option<String>,
    enabled: bool,
    icon: Option<ImageData>,
}

/// Page action that keeps its state in memory and optionally writes each
/// committed icon to a PNG file.
#[derive(Debug, Default)]
pub struct IconFileAction {
    icon_out: Option<PathBuf>,
    state: Mutex<ActionState>,
}

impl IconFileAction {
    pub fn new(icon_out: Option<PathBuf>) -> Self {
        Self {
            icon_out,
            state: Mutex::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ActionState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn title(&self) -> Option<String> {
        self.state().title.clone()
    }

    pub fn enabled(&self) -> bool {
        self.state().enabled
    }

    /// The last committed icon.
    pub fn icon(&self) -> Option<ImageData> {
        self.state().icon.clone()
    }
}

impl ActionApi for IconFileAction {
    fn set_title<'a>(&'a self, tab_id: TabId, title: &'a str) -> BoxFuture<'a, Result<(), ActionError>> {
        log::debug!("Tab {tab_id} title: {title}");
        self.state().title = Some(title.to_string());
        Box::pin(async { Ok(()) })
    }

    fn set_icon_image(&self, tab_id: TabId, image: ImageData) -> BoxFuture<'_, Result<(), ActionError>> {
        Box::pin(async move {
            if let Some(path) = &self.icon_out {
                let png = encode_png(image.width, image.height, &image.data)
                    .map_err(|e| ActionError(e.to_string()))?;
                tokio::fs::write(path, png)
                    .await
                    .map_err(|e| ActionError(format!("{}: {e}", path.display())))?;
                log::debug!("Tab {tab_id} icon written to {}", path.display());
            }
            self.state().icon = Some(image);
            Ok(())
        })
    }

    fn enable(&self, _tab_id: TabId) -> BoxFuture<'_, Result<(), ActionError>> {
        self.state().enabled = true;
        Box::pin(async { Ok(()) })
    }

    fn disable(&self, _tab_id: TabId) -> BoxFuture<'_, Result<(), ActionError>> {
        self.state().enabled = false;
        Box::pin(async { Ok(()) })
    }
}

/// A window with one tab. New tabs are only logged.
#[derive(Debug)]
pub struct SingleTab {
    tab: Tab,
    opened: Mutex<Vec<String>>,
}

impl SingleTab {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            tab: Tab::new(SHELL_TAB_ID, url),
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    /// URLs passed to [`TabsApi::create`].
    pub fn opened(&self) -> Vec<String> {
        match self.opened.lock() {
            Ok(opened) => opened.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TabsApi for SingleTab {
    fn get(&self, tab_id: TabId) -> BoxFuture<'_, Result<Option<Tab>, ActionError>> {
        let tab = (tab_id == self.tab.id).then(|| self.tab.clone());
        Box::pin(async move { Ok(tab) })
    }

    fn query_active(&self) -> BoxFuture<'_, Result<Option<Tab>, ActionError>> {
        let tab = self.tab.clone();
        Box::pin(async move { Ok(Some(tab)) })
    }

    fn query_all(&self) -> BoxFuture<'_, Result<Vec<Tab>, ActionError>> {
        let tabs = vec![self.tab.clone()];
        Box::pin(async move { Ok(tabs) })
    }

    fn create<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), ActionError>> {
        log::info!("Open in a browser: {url}");
        match self.opened.lock() {
            Ok(mut opened) => opened.push(url.to_string()),
            Err(poisoned) => poisoned.into_inner().push(url.to_string()),
        }
        Box::pin(async { Ok(()) })
    }
}

/// Popup surface that logs instead of drawing.
#[derive(Debug, Default)]
pub struct LogSurface;

impl PopupSurface for LogSurface {
    fn set_loading(&self, loading: bool) {
        log::debug!("Popup loading: {loading}");
    }

    fn render(&self, view: &PopupView) {
        log::debug!("Popup layout: {:?}", view.layout.map(|layout| layout.as_ref().to_string()));
    }
}

/// Everything the CLI needs for one URL.
pub struct Shell {
    pub action: Arc<IconFileAction>,
    pub tabs: Arc<SingleTab>,
    pub flags: Arc<FlagController>,
    pub popup: PopupController,
}

impl Shell {
    /// Assembles the native capabilities from `config` for the tab at `url`.
    pub fn from_config(config: &Config, url: &str, icon_out: Option<&Path>) -> Result<Self> {
        let client = init_client(config).context("Failed to initialize HTTP client")?;
        let mut resolver = Resolver::new(client.clone(), &config.doh_endpoint);
        if config.native_resolver {
            resolver = resolver.with_native(Arc::new(SystemResolver::new(init_resolver())));
        }
        let lookup = GeoLookup::new(resolver, client, &config.geo_endpoint);

        let store = JsonFileStore::new(&config.store_path, Some(config.store_quota_bytes));
        let cache = DomainCache::new(Arc::new(store));

        let action = Arc::new(IconFileAction::new(icon_out.map(Path::to_path_buf)));
        let canvases =
            init_canvas_factory(config).context("Failed to initialize the icon canvas")?;
        let renderer = IconRenderer::new(
            Arc::new(DirAssets::new(&config.assets_dir)),
            Arc::new(ImageDecoder),
            Arc::new(canvases),
            action.clone(),
        );

        let flags = Arc::new(FlagController::new(
            cache,
            lookup,
            renderer,
            action.clone(),
            Arc::new(SystemClock),
        ));
        let tabs = Arc::new(SingleTab::new(url));
        let popup = PopupController::new(flags.clone(), tabs.clone(), Arc::new(LogSurface));

        Ok(Self {
            action,
            tabs,
            flags,
            popup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_tab_queries() {
        let tabs = SingleTab::new("https://example.com/");
        assert_eq!(tabs.get(SHELL_TAB_ID).await.unwrap(), Some(tabs.tab().clone()));
        assert_eq!(tabs.get(2).await.unwrap(), None);
        assert_eq!(tabs.query_all().await.unwrap().len(), 1);
        tabs.create("https://donate.example").await.unwrap();
        assert_eq!(tabs.opened(), vec!["https://donate.example".to_string()]);
    }

    #[tokio::test]
    async fn test_icon_file_action_writes_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("icon.png");
        let action = IconFileAction::new(Some(out.clone()));

        let image = ImageData {
            width: 2,
            height: 2,
            data: vec![255; 16],
        };
        action.set_icon_image(SHELL_TAB_ID, image.clone()).await.unwrap();
        action.set_title(SHELL_TAB_ID, "Ukraine").await.unwrap();
        action.enable(SHELL_TAB_ID).await.unwrap();

        assert_eq!(action.icon(), Some(image));
        assert_eq!(action.title().as_deref(), Some("Ukraine"));
        assert!(action.enabled());
        let written = std::fs::read(&out).unwrap();
        assert_eq!(&written[1..4], b"PNG");
    }
}
