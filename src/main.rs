//! cointick — entry point
//!
//! Orchestrates:
//! 1. Config + logging initialization
//! 2. Feed event channel
//! 3. PriceFeed on the configured exchange
//! 4. Event loop logging catalog and price changes
//! 5. Ctrl+C graceful shutdown

use tracing::{info, warn};

use cointick::config::{init_logging, TickerConfig};
use cointick::core::{feed_channel, FeedEvent, PriceFeed, PRICE_NOT_LOADED};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    info!("=== cointick price feed ===");

    let config_path = TickerConfig::default_path();
    let config = match TickerConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, path = %config_path.display(), "Bad config file, using defaults");
            TickerConfig::default()
        }
    };

    let (events, mut rx) = feed_channel();
    let mut feed = PriceFeed::new(config, events);

    info!(exchange = %feed.site(), "Starting price feed");
    feed.start().await?;

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(FeedEvent::CatalogUpdated(pairs)) => {
                        info!(
                            exchange = %feed.site(),
                            available = pairs.len(),
                            selected = ?feed.selected_currency_pairs(),
                            "Catalog updated"
                        );
                    }
                    Some(FeedEvent::PricesUpdated) => {
                        for pair in feed.selected_currency_pairs() {
                            let price = feed.price(pair);
                            if price != PRICE_NOT_LOADED {
                                info!(pair = %pair, price, "Price");
                            }
                        }
                    }
                    Some(FeedEvent::Offline) => {
                        warn!(exchange = %feed.site(), "Exchange offline");
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                feed.stop();
                break;
            }
        }
    }

    Ok(())
}
