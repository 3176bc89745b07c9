// Shared test helpers: in-memory fakes for every platform capability and a
// harness that wires them to a FlagController backed by a wiremock server.

#![allow(dead_code)] // Each test file uses a different subset

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Error;
use futures::future::BoxFuture;
use image::{Rgba, RgbaImage};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain_flag::icon::{encode_png, GlyphSet, ImageData, ImageDecoder, MemoryAssets, RasterCanvasFactory};
use domain_flag::{
    ActionApi, ActionError, Clock, DomainCache, FlagController, GeoLookup, IconRenderer,
    MemoryStore, NativeResolve, PopupSurface, PopupView, Resolver, Tab, TabId, TabsApi,
};

pub const NOW: i64 = 1_700_000_000_000;
pub const UA_BLUE: [u8; 4] = [0, 87, 183, 255];
pub const LOCAL_GREEN: [u8; 4] = [0, 160, 0, 255];
pub const ICON_GREY: [u8; 4] = [128, 128, 128, 255];

/// Native resolver answering from a fixed table and counting calls.
#[derive(Default)]
pub struct CountingResolver {
    answers: HashMap<String, IpAddr>,
    calls: AtomicUsize,
}

impl CountingResolver {
    pub fn with(mut self, domain: &str, ip: &str) -> Self {
        self.answers.insert(domain.to_string(), ip.parse().unwrap());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NativeResolve for CountingResolver {
    fn resolve<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<Vec<IpAddr>, Error>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self
            .answers
            .get(domain)
            .map(|ip| vec![*ip])
            .ok_or_else(|| Error::msg(format!("NXDOMAIN {domain}")));
        Box::pin(async move { answer })
    }
}

/// Page action that records every call.
#[derive(Default)]
pub struct RecordingAction {
    titles: Mutex<HashMap<TabId, String>>,
    icons: Mutex<Vec<(TabId, ImageData)>>,
    enabled: Mutex<HashMap<TabId, bool>>,
}

impl RecordingAction {
    pub fn title(&self, tab_id: TabId) -> Option<String> {
        self.titles.lock().unwrap().get(&tab_id).cloned()
    }

    pub fn enabled(&self, tab_id: TabId) -> Option<bool> {
        self.enabled.lock().unwrap().get(&tab_id).copied()
    }

    pub fn icon_count(&self) -> usize {
        self.icons.lock().unwrap().len()
    }

    /// RGBA of a pixel of the last icon committed for `tab_id`.
    pub fn last_icon_pixel(&self, tab_id: TabId, x: u32, y: u32) -> [u8; 4] {
        let icons = self.icons.lock().unwrap();
        let (_, icon) = icons
            .iter()
            .rev()
            .find(|(id, _)| *id == tab_id)
            .expect("no icon committed");
        let at = ((y * icon.width + x) * 4) as usize;
        icon.data[at..at + 4].try_into().unwrap()
    }
}

impl ActionApi for RecordingAction {
    fn set_title<'a>(&'a self, tab_id: TabId, title: &'a str) -> BoxFuture<'a, Result<(), ActionError>> {
        self.titles.lock().unwrap().insert(tab_id, title.to_string());
        Box::pin(async { Ok(()) })
    }

    fn set_icon_image(&self, tab_id: TabId, image: ImageData) -> BoxFuture<'_, Result<(), ActionError>> {
        self.icons.lock().unwrap().push((tab_id, image));
        Box::pin(async { Ok(()) })
    }

    fn enable(&self, tab_id: TabId) -> BoxFuture<'_, Result<(), ActionError>> {
        self.enabled.lock().unwrap().insert(tab_id, true);
        Box::pin(async { Ok(()) })
    }

    fn disable(&self, tab_id: TabId) -> BoxFuture<'_, Result<(), ActionError>> {
        self.enabled.lock().unwrap().insert(tab_id, false);
        Box::pin(async { Ok(()) })
    }
}

/// Clock that only moves when told to.
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Tabs of a single window; the first tab is active.
#[derive(Default)]
pub struct FakeTabs {
    tabs: Vec<Tab>,
    created: Mutex<Vec<String>>,
}

impl FakeTabs {
    pub fn new(tabs: Vec<Tab>) -> Self {
        Self {
            tabs,
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

impl TabsApi for FakeTabs {
    fn get(&self, tab_id: TabId) -> BoxFuture<'_, Result<Option<Tab>, ActionError>> {
        let tab = self.tabs.iter().find(|tab| tab.id == tab_id).cloned();
        Box::pin(async move { Ok(tab) })
    }

    fn query_active(&self) -> BoxFuture<'_, Result<Option<Tab>, ActionError>> {
        let tab = self.tabs.first().cloned();
        Box::pin(async move { Ok(tab) })
    }

    fn query_all(&self) -> BoxFuture<'_, Result<Vec<Tab>, ActionError>> {
        let tabs = self.tabs.clone();
        Box::pin(async move { Ok(tabs) })
    }

    fn create<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), ActionError>> {
        self.created.lock().unwrap().push(url.to_string());
        Box::pin(async { Ok(()) })
    }
}

/// Popup surface recording the loading toggles and rendered views.
#[derive(Default)]
pub struct RecordingSurface {
    pub loading: Mutex<Vec<bool>>,
    pub views: Mutex<Vec<PopupView>>,
}

impl PopupSurface for RecordingSurface {
    fn set_loading(&self, loading: bool) {
        self.loading.lock().unwrap().push(loading);
    }

    fn render(&self, view: &PopupView) {
        self.views.lock().unwrap().push(view.clone());
    }
}

fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    encode_png(width, height, image.as_raw()).unwrap()
}

/// Icon assets as solid-color PNGs so tests can tell which one was drawn.
pub fn test_assets() -> MemoryAssets {
    let mut assets = MemoryAssets::new();
    assets.insert("/img/flags/ua.png", solid_png(16, 11, UA_BLUE));
    assets.insert("/img/local.png", solid_png(16, 16, LOCAL_GREEN));
    assets.insert("/img/icon.png", solid_png(16, 16, ICON_GREY));
    // Present but undecodable
    assets.insert("/img/flags/xx.png", b"not a png".to_vec());
    assets
}

/// Everything needed to drive `set_flag` end to end.
pub struct Harness {
    pub server: MockServer,
    pub native: Arc<CountingResolver>,
    pub action: Arc<RecordingAction>,
    pub clock: Arc<FixedClock>,
    pub store: Arc<MemoryStore>,
    pub flags: Arc<FlagController>,
}

impl Harness {
    pub async fn new(native: CountingResolver) -> Self {
        Self::with_filters(native, true).await
    }

    pub async fn with_filters(native: CountingResolver, filters: bool) -> Self {
        let server = MockServer::start().await;
        let native = Arc::new(native);
        let client = reqwest::Client::new();
        let resolver = Resolver::new(client.clone(), format!("{}/resolve", server.uri()))
            .with_native(native.clone());
        let lookup = GeoLookup::new(resolver, client, format!("{}/geo", server.uri()));

        let action = Arc::new(RecordingAction::default());
        let renderer = IconRenderer::new(
            Arc::new(test_assets()),
            Arc::new(ImageDecoder),
            Arc::new(RasterCanvasFactory::new(GlyphSet::new(), filters)),
            action.clone(),
        );
        let clock = Arc::new(FixedClock::new(NOW));
        let store = Arc::new(MemoryStore::new());
        let flags = Arc::new(FlagController::new(
            DomainCache::new(store.clone()),
            lookup,
            renderer,
            action.clone(),
            clock.clone(),
        ));

        Self {
            server,
            native,
            action,
            clock,
            store,
            flags,
        }
    }

    pub fn cache(&self) -> &DomainCache {
        self.flags.cache()
    }

    /// Geolocation answers `body` with `status` for `ip`, expecting `times` calls.
    pub async fn geo_responds(&self, ip: &str, status: u16, body: Value, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/geo/{ip}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Counts requests the geolocation service received.
    pub async fn geo_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().starts_with("/geo/"))
            .count()
    }
}

pub fn ukraine() -> Value {
    json!({
        "country_code": "UA",
        "country_name": "Ukraine",
        "city": "Boyarka",
        "region": "Kyiv Metro Area",
        "ip": "9.9.9.9",
    })
}
