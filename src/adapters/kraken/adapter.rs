//! Kraken Adapter Implementation
//!
//! Polling-only adapter. Catalog from AssetPairs (dark-pool ".d" entries
//! skipped), prices from one comma-joined Ticker call per round.

use async_trait::async_trait;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::traits::ExchangeAdapter;
use crate::adapters::types::{ExchangeSite, PriceUpdate};
use crate::model::CurrencyPair;

use super::config::KrakenConfig;
use super::types::{KrakenAssetPairs, KrakenResponse, KrakenTickers};

/// Kraken adapter (REST polling only).
pub struct KrakenAdapter {
    config: KrakenConfig,
    client: reqwest::Client,
}

impl KrakenAdapter {
    pub fn new(config: KrakenConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ExchangeAdapter for KrakenAdapter {
    fn site(&self) -> ExchangeSite {
        ExchangeSite::Kraken
    }

    async fn list_available_pairs(&self) -> ExchangeResult<Vec<CurrencyPair>> {
        let url = format!("{}/0/public/AssetPairs", self.config.rest_url);
        let response: KrakenResponse<KrakenAssetPairs> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let pairs = response
            .into_result()?
            .into_iter()
            .filter(|(code, _)| !code.contains(".d"))
            .filter_map(|(code, entry)| {
                let pair = CurrencyPair::from_codes(&entry.base, &entry.quote, Some(code.clone()));
                if pair.is_none() {
                    tracing::debug!(
                        exchange = "kraken",
                        pair_code = %code,
                        "Skipping pair that failed to normalize"
                    );
                }
                pair
            })
            .collect();
        Ok(pairs)
    }

    /// One batched Ticker call with a comma-joined pair list. Pairs the
    /// response omits keep their stale cached price.
    async fn fetch_prices(&self, selected: &[CurrencyPair]) -> ExchangeResult<Vec<PriceUpdate>> {
        let joined = selected
            .iter()
            .map(|pair| pair.custom_code())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/0/public/Ticker?pair={}", self.config.rest_url, joined);
        let response: KrakenResponse<KrakenTickers> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut updates = Vec::with_capacity(selected.len());
        for (code, ticker) in response.into_result()? {
            if !selected.iter().any(|pair| pair.custom_code() == code) {
                continue;
            }
            match ticker.c.first().map(|price| price.parse::<f64>()) {
                Some(Ok(price)) => updates.push(PriceUpdate::new(&code, price)),
                _ => tracing::warn!(
                    exchange = "kraken",
                    pair_code = %code,
                    "Ticker entry missing a parseable last-trade price"
                ),
            }
        }
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(base: &str, quote: &str, code: &str) -> CurrencyPair {
        CurrencyPair::from_codes(base, quote, Some(code.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_list_available_pairs_normalizes_prefixes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/0/public/AssetPairs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "error": [],
                    "result": {
                        "XXBTZUSD": {"base":"XXBT","quote":"ZUSD"},
                        "XXBTZUSD.d": {"base":"XXBT","quote":"ZUSD"},
                        "XETHXXBT": {"base":"XETH","quote":"XXBT"}
                    }
                }"#,
            )
            .create_async()
            .await;

        let adapter = KrakenAdapter::new(KrakenConfig::with_rest_url(server.url()));
        let mut pairs = adapter.list_available_pairs().await.unwrap();
        pairs.sort();

        // Dark-pool ".d" entry dropped; X/Z prefixes collapsed
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].code("-"), "BTC-USD");
        assert_eq!(pairs[0].custom_code(), "XXBTZUSD");
        assert_eq!(pairs[1].code("-"), "ETH-BTC");
    }

    #[tokio::test]
    async fn test_fetch_prices_comma_joined_batch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/0/public/Ticker?pair=XXBTZUSD,XETHZUSD")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "error": [],
                    "result": {
                        "XXBTZUSD": {"c":["64000.5","0.01"]},
                        "XETHZUSD": {"c":["3100.25","0.5"]}
                    }
                }"#,
            )
            .create_async()
            .await;

        let adapter = KrakenAdapter::new(KrakenConfig::with_rest_url(server.url()));
        let selected = vec![
            pair("XBT", "USD", "XXBTZUSD"),
            pair("ETH", "USD", "XETHZUSD"),
        ];
        let mut updates = adapter.fetch_prices(&selected).await.unwrap();
        updates.sort_by(|a, b| a.custom_code.cmp(&b.custom_code));

        mock.assert_async().await;
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].custom_code, "XXBTZUSD");
        assert_eq!(updates[1].price, 64000.5);
    }

    #[tokio::test]
    async fn test_partial_batch_keeps_other_pairs() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/0/public/Ticker?pair=XXBTZUSD,XETHZUSD")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "error": ["EQuery:Unknown asset pair XETHZUSD"],
                    "result": {
                        "XXBTZUSD": {"c":["64000.5","0.01"]}
                    }
                }"#,
            )
            .create_async()
            .await;

        let adapter = KrakenAdapter::new(KrakenConfig::with_rest_url(server.url()));
        let selected = vec![
            pair("XBT", "USD", "XXBTZUSD"),
            pair("ETH", "USD", "XETHZUSD"),
        ];
        let updates = adapter.fetch_prices(&selected).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].custom_code, "XXBTZUSD");
    }

    #[tokio::test]
    async fn test_streaming_unsupported() {
        let adapter = KrakenAdapter::new(KrakenConfig::default());
        assert!(!adapter.supports_streaming());
    }
}
