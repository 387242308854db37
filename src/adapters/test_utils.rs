//! Shared test utilities for coordinator and lifecycle testing
//!
//! Provides a scriptable `MockAdapter` used by unit tests and the
//! integration tests in `tests/`. Not compiled out of the lib because the
//! integration tests link against the public crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::ExchangeAdapter;
use crate::adapters::types::{ExchangeSite, PriceUpdate};
use crate::model::CurrencyPair;

/// Scriptable in-memory exchange.
///
/// The catalog and the per-round prices are set up front; tests observe
/// fetch rounds, subscribe calls, and can feed the stream by hand.
pub struct MockAdapter {
    site: ExchangeSite,
    streaming: bool,
    fail_catalog: bool,
    catalog: Vec<CurrencyPair>,
    /// custom code -> price served on every polling round
    prices: Mutex<HashMap<String, f64>>,
    fetch_rounds: AtomicU64,
    /// artificial latency per polling round, for cancellation-race tests
    fetch_delay_ms: AtomicU64,
    /// wire codes passed to the most recent open_stream call
    subscribed: Mutex<Vec<String>>,
    /// updates replayed into the stream as soon as it opens
    stream_script: Mutex<Vec<PriceUpdate>>,
    stream_opens: AtomicU64,
}

impl MockAdapter {
    pub fn new(site: ExchangeSite) -> Self {
        Self {
            site,
            streaming: false,
            fail_catalog: false,
            catalog: Vec::new(),
            prices: Mutex::new(HashMap::new()),
            fetch_rounds: AtomicU64::new(0),
            fetch_delay_ms: AtomicU64::new(0),
            subscribed: Mutex::new(Vec::new()),
            stream_script: Mutex::new(Vec::new()),
            stream_opens: AtomicU64::new(0),
        }
    }

    /// Polling-only mock with the given (base, quote) catalog; wire codes
    /// default to concatenated normalized codes.
    pub fn with_catalog(entries: &[(&str, &str)]) -> Self {
        let mut mock = Self::new(ExchangeSite::Kraken);
        mock.catalog = entries
            .iter()
            .map(|(base, quote)| CurrencyPair::from_codes(base, quote, None).unwrap())
            .collect();
        mock
    }

    /// Streaming-capable variant.
    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    /// Make `list_available_pairs` fail.
    pub fn failing_catalog(mut self) -> Self {
        self.fail_catalog = true;
        self
    }

    /// Set the price served for a wire code on polling rounds.
    pub fn set_price(&self, custom_code: &str, price: f64) {
        self.prices
            .lock()
            .unwrap()
            .insert(custom_code.to_string(), price);
    }

    /// Queue updates to be replayed when a stream opens.
    pub fn script_stream(&self, updates: Vec<PriceUpdate>) {
        *self.stream_script.lock().unwrap() = updates;
    }

    /// Delay every polling round, so tests can cancel mid-flight.
    pub fn set_fetch_delay_ms(&self, ms: u64) {
        self.fetch_delay_ms.store(ms, Ordering::SeqCst);
    }

    pub fn fetch_rounds(&self) -> u64 {
        self.fetch_rounds.load(Ordering::SeqCst)
    }

    pub fn stream_opens(&self) -> u64 {
        self.stream_opens.load(Ordering::SeqCst)
    }

    /// Wire codes subscribed by the most recent stream.
    pub fn subscribed_codes(&self) -> Vec<String> {
        self.subscribed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeAdapter for MockAdapter {
    fn site(&self) -> ExchangeSite {
        self.site
    }

    fn supports_streaming(&self) -> bool {
        self.streaming
    }

    async fn list_available_pairs(&self) -> ExchangeResult<Vec<CurrencyPair>> {
        if self.fail_catalog {
            return Err(ExchangeError::ConnectionFailed("mock offline".into()));
        }
        Ok(self.catalog.clone())
    }

    async fn fetch_prices(&self, selected: &[CurrencyPair]) -> ExchangeResult<Vec<PriceUpdate>> {
        self.fetch_rounds.fetch_add(1, Ordering::SeqCst);
        let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        let prices = self.prices.lock().unwrap();
        Ok(selected
            .iter()
            .filter_map(|pair| {
                prices
                    .get(pair.custom_code())
                    .map(|price| PriceUpdate::new(pair.custom_code(), *price))
            })
            .collect())
    }

    async fn open_stream(
        &self,
        selected: &[CurrencyPair],
        updates: mpsc::UnboundedSender<PriceUpdate>,
    ) -> ExchangeResult<JoinHandle<()>> {
        if !self.streaming {
            return Err(ExchangeError::StreamingUnsupported(self.site));
        }
        self.stream_opens.fetch_add(1, Ordering::SeqCst);
        *self.subscribed.lock().unwrap() = selected
            .iter()
            .map(|pair| pair.custom_code().to_string())
            .collect();

        let script = std::mem::take(&mut *self.stream_script.lock().unwrap());
        Ok(tokio::spawn(async move {
            for update in script {
                if updates.send(update).is_err() {
                    return;
                }
            }
            // Keep the "connection" open until the receiver goes away.
            updates.closed().await;
        }))
    }
}
