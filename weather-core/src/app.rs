//! The weather-fetch state machine.
//!
//! `Idle -> Loading -> {Success, Error}`, and back to `Loading` on the next
//! user action. Every action spawns one task on the current tokio runtime and
//! returns its handle; front ends observe changes through [`WeatherApp::subscribe`].

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{
    sync::watch,
    task::{AbortHandle, JoinHandle},
};
use tracing::{debug, info, warn};

use crate::{
    config::{Config, DEFAULT_ERROR_DISPLAY_SECS},
    error::{FetchError, WeatherError},
    fetcher::WeatherFetcher,
    location::LocationResolver,
    model::{Unit, ViewState, WeatherQuery},
};

/// Session settings taken from config.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub unit: Unit,
    pub error_display: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self { unit: Unit::default(), error_display: Duration::from_secs(DEFAULT_ERROR_DISPLAY_SECS) }
    }
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self { unit: config.units, error_display: config.error_display() }
    }
}

/// What the input side can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    QueryChanged(String),
    SearchSubmitted,
    LocationRequested,
    UnitToggled,
}

#[derive(Debug, Clone)]
pub struct WeatherApp {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    fetcher: Arc<dyn WeatherFetcher>,
    locator: Arc<dyn LocationResolver>,
    state: watch::Sender<ViewState>,
    /// Sequence number of the most recently started operation.
    latest: AtomicU64,
    /// Lock order: `pending_clear` before `state`.
    pending_clear: Mutex<Option<PendingClear>>,
    error_display: Duration,
}

#[derive(Debug)]
struct PendingClear {
    seq: u64,
    handle: AbortHandle,
}

impl WeatherApp {
    pub fn new(
        fetcher: Arc<dyn WeatherFetcher>,
        locator: Arc<dyn LocationResolver>,
        settings: AppSettings,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::with_unit(settings.unit));

        Self {
            inner: Arc::new(Inner {
                fetcher,
                locator,
                state,
                latest: AtomicU64::new(0),
                pending_clear: Mutex::new(None),
                error_display: settings.error_display,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Route an input intent. Returns the spawned operation, if any.
    pub fn dispatch(&self, intent: Intent) -> Option<JoinHandle<()>> {
        match intent {
            Intent::QueryChanged(text) => {
                self.set_query(text);
                None
            }
            Intent::SearchSubmitted => self.submit_search(),
            Intent::LocationRequested => Some(self.use_my_location()),
            Intent::UnitToggled => Some(self.toggle_unit()),
        }
    }

    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_if_modified(|s| {
            if s.query == text {
                return false;
            }
            s.query = text;
            true
        });
    }

    /// Initial load: weather for the device location.
    pub fn mount(&self) -> JoinHandle<()> {
        self.start_location_flow(|_| {})
    }

    pub fn use_my_location(&self) -> JoinHandle<()> {
        self.start_location_flow(|_| {})
    }

    /// Flip the unit system and reload from the device location.
    ///
    /// A city that was searched for is not refetched; the view reverts to
    /// the device location.
    pub fn toggle_unit(&self) -> JoinHandle<()> {
        self.start_location_flow(|s| s.unit = s.unit.toggled())
    }

    /// Search for the current query. Whitespace-only queries are ignored.
    pub fn submit_search(&self) -> Option<JoinHandle<()>> {
        let name = self.inner.state.borrow().query.trim().to_string();
        if name.is_empty() {
            debug!("ignoring empty search");
            return None;
        }

        let (seq, unit) = self.inner.begin(|_| {});
        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move { inner.run_search(seq, name, unit).await }))
    }

    /// Type `text` into the search field and submit it.
    pub fn search(&self, text: impl Into<String>) -> Option<JoinHandle<()>> {
        self.set_query(text);
        self.submit_search()
    }

    fn start_location_flow(&self, prepare: impl FnOnce(&mut ViewState)) -> JoinHandle<()> {
        let (seq, unit) = self.inner.begin(prepare);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.run_location(seq, unit).await })
    }
}

impl Inner {
    /// Enter `Loading` for a new operation and return its sequence number.
    fn begin(&self, prepare: impl FnOnce(&mut ViewState)) -> (u64, Unit) {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let mut pending = self.pending_clear.lock();
        if let Some(prev) = pending.take() {
            prev.handle.abort();
        }

        let mut unit = Unit::default();
        self.state.send_modify(|s| {
            prepare(s);
            s.loading = true;
            s.error = None;
            unit = s.unit;
        });

        (seq, unit)
    }

    fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    /// Apply the outcome of operation `seq` unless a newer one has started.
    fn complete(&self, seq: u64, apply: impl FnOnce(&mut ViewState)) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if !self.is_current(seq) {
                return false;
            }
            s.loading = false;
            apply(s);
            true
        });

        if !applied {
            debug!(seq, "discarding stale result");
        }
        applied
    }

    fn fail(self: &Arc<Self>, seq: u64, err: WeatherError, clear_query: bool) {
        let mut pending = self.pending_clear.lock();

        let message = err.to_string();
        let applied = self.complete(seq, |s| {
            s.error = Some(message);
            if clear_query {
                s.query.clear();
            }
        });
        if !applied {
            return;
        }

        if let Some(prev) = pending.take() {
            prev.handle.abort();
        }
        *pending = Some(PendingClear { seq, handle: self.schedule_error_clear(seq) });
    }

    fn schedule_error_clear(self: &Arc<Self>, seq: u64) -> AbortHandle {
        let inner = Arc::clone(self);
        let after = self.error_display;

        tokio::spawn(async move {
            tokio::time::sleep(after).await;

            let mut pending = inner.pending_clear.lock();
            if pending.as_ref().is_some_and(|p| p.seq == seq) {
                *pending = None;
                inner.state.send_if_modified(|s| s.error.take().is_some());
            }
        })
        .abort_handle()
    }

    async fn run_location(self: Arc<Self>, seq: u64, unit: Unit) {
        let at = match self.locator.resolve().await {
            Ok(at) => at,
            Err(err) => {
                warn!(error = %err, "location lookup failed");
                self.fail(seq, err.into(), false);
                return;
            }
        };

        if !self.is_current(seq) {
            debug!(seq, "location resolved for a superseded request, skipping fetch");
            return;
        }

        match self.fetcher.fetch(&WeatherQuery::coords(at), unit).await {
            Ok(weather) => {
                info!(name = %weather.name, "weather loaded for device location");
                self.complete(seq, |s| {
                    s.weather = Some(weather);
                    s.location_access = true;
                });
            }
            Err(err) => {
                warn!(error = %err, "weather fetch by coordinates failed");
                self.fail(seq, err.into(), false);
            }
        }
    }

    async fn run_search(self: Arc<Self>, seq: u64, name: String, unit: Unit) {
        match self.fetcher.fetch_by_city(&name, unit).await {
            Ok(weather) => {
                info!(query = %name, name = %weather.name, "weather loaded for search");
                self.complete(seq, |s| {
                    s.weather = Some(weather);
                    s.location_access = false;
                    s.query.clear();
                });
            }
            Err(err) => {
                warn!(query = %name, error = %err, "weather search failed");
                // The API answered, so the query is consumed like a success.
                let clear_query = matches!(err, FetchError::Api { .. });
                self.fail(seq, err.into(), clear_query);
            }
        }
    }
}
