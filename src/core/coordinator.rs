//! Exchange coordinator
//!
//! Owns one adapter and drives its lifecycle: load the pair catalog,
//! reconcile the selection, then keep prices fresh by polling or
//! streaming. All background work is generation-guarded so that results
//! from a superseded cycle can never touch the cache or notify the
//! consumer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::adapters::{ExchangeAdapter, ExchangeSite};
use crate::core::events::{FeedEvent, FeedEventSender};
use crate::core::selection::{reconcile, MAX_SELECTED_PAIRS};
use crate::model::{Currency, CurrencyPair};

// =============================================================================
// Constants
// =============================================================================

/// Sentinel returned by `price` before the first update arrives.
pub const PRICE_NOT_LOADED: f64 = -1.0;

/// Update-interval value (seconds) that requests streaming where the
/// adapter supports it. On polling-only exchanges it behaves as a plain
/// 5-second interval.
pub const REAL_TIME_UPDATE_INTERVAL: u64 = 5;

// =============================================================================
// State
// =============================================================================

/// How the current Ready state keeps prices fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Polling,
    Streaming,
}

/// Coordinator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// Constructed, or catalog load failed. No background work running.
    Idle,
    /// Catalog load in flight.
    Loading,
    /// Catalog loaded, prices being kept fresh.
    Ready(FetchMode),
    /// Explicitly stopped. No background work running.
    Stopped,
}

/// Coordinator for a single exchange site.
///
/// Generic over the adapter so tests can drive it with a scriptable mock;
/// production code uses `Exchange<AnyAdapter>`.
pub struct Exchange<A: ExchangeAdapter + 'static> {
    adapter: Arc<A>,
    state: FeedState,
    available: Vec<CurrencyPair>,
    selected: Vec<CurrencyPair>,
    update_interval: u64,
    locale_currency: Option<Currency>,
    /// wire code -> last observed price
    prices: Arc<RwLock<HashMap<String, f64>>>,
    /// Bumped on every stop; background tasks carry the value they were
    /// spawned under and go silent when it no longer matches.
    generation: Arc<AtomicU64>,
    tasks: Vec<JoinHandle<()>>,
    events: FeedEventSender,
}

impl<A: ExchangeAdapter + 'static> Exchange<A> {
    /// Build an idle coordinator. `selection_hint` is the previous
    /// selection (possibly from another exchange); it is reconciled
    /// against the catalog on `load`.
    pub fn new(
        adapter: A,
        update_interval: u64,
        selection_hint: Vec<CurrencyPair>,
        events: FeedEventSender,
    ) -> Self {
        Self::new_shared(Arc::new(adapter), update_interval, selection_hint, events)
    }

    /// Like `new`, but shares an already-wrapped adapter with the caller.
    pub fn new_shared(
        adapter: Arc<A>,
        update_interval: u64,
        selection_hint: Vec<CurrencyPair>,
        events: FeedEventSender,
    ) -> Self {
        Self {
            adapter,
            state: FeedState::Idle,
            available: Vec::new(),
            selected: selection_hint,
            update_interval,
            locale_currency: crate::model::system_locale_currency(),
            prices: Arc::new(RwLock::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
            tasks: Vec::new(),
            events,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn site(&self) -> ExchangeSite {
        self.adapter.site()
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Sorted pair catalog from the last successful load.
    pub fn available_currency_pairs(&self) -> &[CurrencyPair] {
        &self.available
    }

    /// Current selection, sorted, at most `MAX_SELECTED_PAIRS` entries.
    pub fn selected_currency_pairs(&self) -> &[CurrencyPair] {
        &self.selected
    }

    pub fn update_interval(&self) -> u64 {
        self.update_interval
    }

    /// Whether the configured interval requests real-time streaming.
    pub fn is_real_time(&self) -> bool {
        self.update_interval == REAL_TIME_UPDATE_INTERVAL
    }

    /// Last observed price for a pair, or `PRICE_NOT_LOADED`.
    ///
    /// Looks up the pair's own wire code first, then falls back to the
    /// equal selected pair's wire code so a caller holding a pair from a
    /// different exchange still gets the cached value.
    pub fn price(&self, pair: &CurrencyPair) -> f64 {
        let cache = match self.prices.read() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(price) = cache.get(pair.custom_code()) {
            return *price;
        }
        self.selected
            .iter()
            .find(|selected| *selected == pair)
            .and_then(|selected| cache.get(selected.custom_code()))
            .copied()
            .unwrap_or(PRICE_NOT_LOADED)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load the catalog, reconcile the selection, and start fetching.
    ///
    /// On catalog failure the coordinator returns to `Idle`, keeps the
    /// previous selection as a hint for the next attempt, and emits
    /// `Offline`.
    pub async fn load(&mut self) {
        self.state = FeedState::Loading;
        tracing::info!(exchange = %self.site(), "Loading currency pair catalog");

        match self.adapter.list_available_pairs().await {
            Ok(mut pairs) => {
                pairs.sort();
                pairs.dedup();
                self.available = pairs;
                self.selected = reconcile(
                    &self.selected,
                    &self.available,
                    self.locale_currency.as_ref(),
                );
                tracing::info!(
                    exchange = %self.site(),
                    pairs = self.available.len(),
                    selected = self.selected.len(),
                    "Catalog loaded"
                );
                let _ = self
                    .events
                    .send(FeedEvent::CatalogUpdated(self.available.clone()));
                self.fetch().await;
            }
            Err(err) => {
                tracing::warn!(exchange = %self.site(), error = %err, "Catalog load failed");
                self.state = FeedState::Idle;
                let _ = self.events.send(FeedEvent::Offline);
            }
        }
    }

    /// Start keeping prices fresh for the current selection.
    ///
    /// Streams when the interval is real-time and the adapter supports
    /// it, polls otherwise. A failed stream open degrades to polling for
    /// this cycle rather than leaving the feed dead.
    pub async fn fetch(&mut self) {
        if self.selected.is_empty() {
            tracing::debug!(exchange = %self.site(), "Nothing selected; feed idle");
            self.state = FeedState::Idle;
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);

        if self.is_real_time() && self.adapter.supports_streaming() {
            match self.open_stream(generation).await {
                Ok(()) => {
                    self.state = FeedState::Ready(FetchMode::Streaming);
                    return;
                }
                Err(err) => {
                    tracing::warn!(
                        exchange = %self.site(),
                        error = %err,
                        "Stream open failed; falling back to polling"
                    );
                }
            }
        }

        self.spawn_poll_loop(generation);
        self.state = FeedState::Ready(FetchMode::Polling);
    }

    /// Stop all background work. Idempotent; in-flight results from
    /// before the stop are discarded by the generation guard.
    pub fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.state = FeedState::Stopped;
        tracing::debug!(exchange = %self.site(), "Feed stopped");
    }

    /// Stop and restart fetching with the current selection and interval.
    pub async fn reset(&mut self) {
        self.stop();
        self.fetch().await;
    }

    // =========================================================================
    // Selection and interval changes
    // =========================================================================

    /// Add or remove a pair from the selection; returns whether anything
    /// changed. Removing the last pair and exceeding the cap are both
    /// rejected. A change resets the feed so the new subscription set
    /// takes effect.
    pub async fn toggle_currency_pair(&mut self, base: &str, quote: &str) -> bool {
        let Some(target) = CurrencyPair::from_codes(base, quote, None) else {
            return false;
        };

        let changed = if let Some(position) = self.selected.iter().position(|p| *p == target) {
            if self.selected.len() > 1 {
                self.selected.remove(position);
                true
            } else {
                tracing::debug!(pair = %target, "Refusing to deselect the last pair");
                false
            }
        } else if self.selected.len() >= MAX_SELECTED_PAIRS {
            tracing::debug!(pair = %target, "Selection already at capacity");
            false
        } else if let Some(pair) = self.available.iter().find(|p| **p == target) {
            self.selected.push(pair.clone());
            self.selected.sort();
            true
        } else {
            tracing::debug!(pair = %target, "Pair not in catalog");
            false
        };

        if changed {
            self.reset().await;
        }
        changed
    }

    /// Change the polling interval (seconds). A change resets the feed,
    /// which may flip between polling and streaming.
    pub async fn set_update_interval(&mut self, seconds: u64) {
        if seconds == self.update_interval {
            return;
        }
        self.update_interval = seconds;
        if matches!(self.state, FeedState::Ready(_)) {
            self.reset().await;
        }
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    fn spawn_poll_loop(&mut self, generation: u64) {
        let adapter = Arc::clone(&self.adapter);
        let prices = Arc::clone(&self.prices);
        let counter = Arc::clone(&self.generation);
        let events = self.events.clone();
        let selected = self.selected.clone();
        let site = self.site();
        // Interval 0 would spin; clamp to one second.
        let interval = Duration::from_secs(self.update_interval.max(1));

        self.tasks.push(tokio::spawn(async move {
            loop {
                let result = adapter.fetch_prices(&selected).await;
                if counter.load(Ordering::SeqCst) != generation {
                    return;
                }
                match result {
                    Ok(updates) if !updates.is_empty() => {
                        {
                            let mut cache = match prices.write() {
                                Ok(cache) => cache,
                                Err(poisoned) => poisoned.into_inner(),
                            };
                            for update in &updates {
                                cache.insert(update.custom_code.clone(), update.price);
                            }
                        }
                        if events.send(FeedEvent::PricesUpdated).is_err() {
                            return;
                        }
                    }
                    Ok(_) => {
                        tracing::debug!(exchange = %site, "Poll round returned no prices");
                    }
                    Err(err) => {
                        tracing::warn!(
                            exchange = %site,
                            error = %err,
                            "Poll round failed; keeping stale prices"
                        );
                    }
                }
                // Interval counts from round completion, so slow rounds
                // never stack.
                tokio::time::sleep(interval).await;
                if counter.load(Ordering::SeqCst) != generation {
                    return;
                }
            }
        }));
    }

    async fn open_stream(&mut self, generation: u64) -> crate::adapters::ExchangeResult<()> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let reader = self.adapter.open_stream(&self.selected, tx).await?;
        self.tasks.push(reader);

        let prices = Arc::clone(&self.prices);
        let counter = Arc::clone(&self.generation);
        let events = self.events.clone();
        let site = self.site();
        let subscribed: Vec<String> = self
            .selected
            .iter()
            .map(|pair| pair.custom_code().to_string())
            .collect();

        self.tasks.push(tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                if counter.load(Ordering::SeqCst) != generation {
                    return;
                }
                // Exchanges sometimes push ticks for products we never
                // subscribed to; drop them.
                if !subscribed.iter().any(|code| *code == update.custom_code) {
                    continue;
                }
                {
                    let mut cache = match prices.write() {
                        Ok(cache) => cache,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    cache.insert(update.custom_code.clone(), update.price);
                }
                if events.send(FeedEvent::PricesUpdated).is_err() {
                    return;
                }
            }
            // Dropped connection: no automatic reconnect. Prices go
            // stale until the consumer resets or switches exchange.
            tracing::warn!(exchange = %site, "Price stream ended");
        }));
        Ok(())
    }
}

impl<A: ExchangeAdapter + 'static> Drop for Exchange<A> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
