//! Consumer notification events
//!
//! The presentation layer sees exactly two kinds of change — the pair
//! catalog and the price table — plus a benign offline signal. Prices are
//! pull-after-notify: `PricesUpdated` carries nothing; the consumer
//! re-reads `Exchange::price` for the pairs it displays.

use tokio::sync::mpsc;

use crate::model::CurrencyPair;

/// Notification delivered to the single consumer channel.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Fired after every successful catalog load / exchange switch.
    CatalogUpdated(Vec<CurrencyPair>),
    /// Fired after every poll round or streaming tick that changed the
    /// price cache.
    PricesUpdated,
    /// Catalog load failed; the feed is idle until the next explicit
    /// load/reset.
    Offline,
}

pub type FeedEventSender = mpsc::UnboundedSender<FeedEvent>;
pub type FeedEventReceiver = mpsc::UnboundedReceiver<FeedEvent>;

/// Build the consumer notification channel.
pub fn feed_channel() -> (FeedEventSender, FeedEventReceiver) {
    mpsc::unbounded_channel()
}
