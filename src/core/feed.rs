//! Price feed manager
//!
//! Sits above the coordinator: owns the active `Exchange<AnyAdapter>`,
//! carries the selection across exchange switches, and writes every
//! user-visible change back to the persisted config.

use crate::adapters::{create_adapter, AnyAdapter, ExchangeSite};
use crate::config::TickerConfig;
use crate::core::coordinator::Exchange;
use crate::core::events::FeedEventSender;
use crate::error::AppResult;
use crate::model::CurrencyPair;

/// Top-level feed: one active exchange at a time.
pub struct PriceFeed {
    exchange: Exchange<AnyAdapter>,
    config: TickerConfig,
    events: FeedEventSender,
}

impl PriceFeed {
    /// Build the feed from persisted config. Unparseable persisted pairs
    /// are dropped; reconciliation on load fills the gap.
    pub fn new(config: TickerConfig, events: FeedEventSender) -> Self {
        let hint = config.selection_hint();
        let exchange = Exchange::new(
            create_adapter(config.exchange_site),
            config.update_interval_secs,
            hint,
            events.clone(),
        );
        Self {
            exchange,
            config,
            events,
        }
    }

    pub fn exchange(&self) -> &Exchange<AnyAdapter> {
        &self.exchange
    }

    pub fn site(&self) -> ExchangeSite {
        self.exchange.site()
    }

    pub fn price(&self, pair: &CurrencyPair) -> f64 {
        self.exchange.price(pair)
    }

    pub fn selected_currency_pairs(&self) -> &[CurrencyPair] {
        self.exchange.selected_currency_pairs()
    }

    pub fn available_currency_pairs(&self) -> &[CurrencyPair] {
        self.exchange.available_currency_pairs()
    }

    /// Load the catalog and start fetching on the configured exchange.
    pub async fn start(&mut self) -> AppResult<()> {
        self.exchange.load().await;
        self.persist()
    }

    /// Tear down the current exchange and bring up another, carrying the
    /// selection over as a reconciliation hint. No-op for the same site.
    pub async fn switch_exchange(&mut self, site: ExchangeSite) -> AppResult<()> {
        if site == self.site() {
            return Ok(());
        }
        tracing::info!(from = %self.site(), to = %site, "Switching exchange");

        let hint = self.exchange.selected_currency_pairs().to_vec();
        self.exchange.stop();
        self.exchange = Exchange::new(
            create_adapter(site),
            self.exchange.update_interval(),
            hint,
            self.events.clone(),
        );
        self.config.exchange_site = site;
        self.exchange.load().await;
        self.persist()
    }

    /// Toggle a pair on the active exchange; persists on change.
    pub async fn toggle_currency_pair(&mut self, base: &str, quote: &str) -> AppResult<bool> {
        let changed = self.exchange.toggle_currency_pair(base, quote).await;
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    /// Change the update interval; persists on change.
    pub async fn set_update_interval(&mut self, seconds: u64) -> AppResult<()> {
        if seconds == self.exchange.update_interval() {
            return Ok(());
        }
        self.exchange.set_update_interval(seconds).await;
        self.config.update_interval_secs = seconds;
        self.persist()
    }

    pub fn stop(&mut self) {
        self.exchange.stop();
    }

    fn persist(&mut self) -> AppResult<()> {
        self.config.update_interval_secs = self.exchange.update_interval();
        self.config.selected_pairs = self
            .exchange
            .selected_currency_pairs()
            .iter()
            .map(|pair| pair.to_string())
            .collect();
        self.config.save()
    }
}
