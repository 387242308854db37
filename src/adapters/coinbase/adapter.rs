//! Coinbase Adapter Implementation
//!
//! Product discovery and per-product ticker polling over REST, plus the
//! "ticker" WebSocket channel for real-time mode.

use async_trait::async_trait;
use futures_util::future::join_all;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::shared::connect_tls;
use crate::adapters::traits::ExchangeAdapter;
use crate::adapters::types::{ExchangeSite, PriceUpdate};
use crate::model::CurrencyPair;

use super::config::CoinbaseConfig;
use super::types::{CoinbaseProduct, CoinbaseTickerResponse, CoinbaseWsMessage};

/// Coinbase Exchange adapter (streaming-capable).
pub struct CoinbaseAdapter {
    config: CoinbaseConfig,
    client: reqwest::Client,
}

impl CoinbaseAdapter {
    pub fn new(config: CoinbaseConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// One ticker request for one product. Failures are reported to the
    /// caller, which logs and drops that pair from the round.
    async fn fetch_one(&self, pair: &CurrencyPair) -> ExchangeResult<PriceUpdate> {
        let url = format!(
            "{}/products/{}/ticker",
            self.config.rest_url,
            pair.custom_code()
        );
        let ticker: CoinbaseTickerResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let price = ticker.price.parse::<f64>().map_err(|e| {
            ExchangeError::InvalidResponse(format!(
                "bad price '{}' for {}: {}",
                ticker.price,
                pair.custom_code(),
                e
            ))
        })?;
        Ok(PriceUpdate::new(pair.custom_code(), price))
    }

    async fn message_reader_loop(
        mut ws_stream: crate::adapters::shared::TlsWebSocketStream,
        updates: mpsc::UnboundedSender<PriceUpdate>,
    ) {
        while let Some(msg_result) = ws_stream.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<CoinbaseWsMessage>(&text) {
                        Ok(CoinbaseWsMessage::Ticker(event)) => {
                            match event.price.parse::<f64>() {
                                Ok(price) => {
                                    let update = PriceUpdate::new(&event.product_id, price);
                                    if updates.send(update).is_err() {
                                        // Receiver gone: the coordinator moved on.
                                        break;
                                    }
                                }
                                Err(e) => tracing::warn!(
                                    exchange = "coinbase",
                                    product_id = %event.product_id,
                                    error = %e,
                                    "Unparseable ticker price"
                                ),
                            }
                        }
                        Ok(CoinbaseWsMessage::Subscriptions(_)) => {
                            tracing::debug!(exchange = "coinbase", "Subscription confirmed");
                        }
                        Err(_) => {
                            tracing::trace!(
                                exchange = "coinbase",
                                message = %text,
                                "Unknown message format"
                            );
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(exchange = "coinbase", "WebSocket closed by server");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(exchange = "coinbase", error = %e, "WebSocket read error");
                    break;
                }
            }
        }
        tracing::info!(exchange = "coinbase", "Ticker stream ended");
    }
}

#[async_trait]
impl ExchangeAdapter for CoinbaseAdapter {
    fn site(&self) -> ExchangeSite {
        ExchangeSite::Coinbase
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    async fn list_available_pairs(&self) -> ExchangeResult<Vec<CurrencyPair>> {
        let url = format!("{}/products", self.config.rest_url);
        let products: Vec<CoinbaseProduct> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let pairs = products
            .into_iter()
            .filter(CoinbaseProduct::is_online)
            .filter_map(|product| {
                let pair = CurrencyPair::from_codes(
                    &product.base_currency,
                    &product.quote_currency,
                    Some(product.id.clone()),
                );
                if pair.is_none() {
                    tracing::debug!(
                        exchange = "coinbase",
                        product_id = %product.id,
                        "Skipping product that failed to normalize"
                    );
                }
                pair
            })
            .collect();
        Ok(pairs)
    }

    /// No batched ticker endpoint: one request per pair, jointly awaited.
    async fn fetch_prices(&self, selected: &[CurrencyPair]) -> ExchangeResult<Vec<PriceUpdate>> {
        let results = join_all(selected.iter().map(|pair| self.fetch_one(pair))).await;

        let mut updates = Vec::with_capacity(selected.len());
        for (pair, result) in selected.iter().zip(results) {
            match result {
                Ok(update) => updates.push(update),
                Err(e) => tracing::warn!(
                    exchange = "coinbase",
                    pair = %pair,
                    error = %e,
                    "Price fetch failed; keeping stale price"
                ),
            }
        }
        Ok(updates)
    }

    async fn open_stream(
        &self,
        selected: &[CurrencyPair],
        updates: mpsc::UnboundedSender<PriceUpdate>,
    ) -> ExchangeResult<JoinHandle<()>> {
        let mut ws_stream = connect_tls(&self.config.ws_url).await?;

        let product_ids: Vec<&str> = selected.iter().map(|pair| pair.custom_code()).collect();
        let subscribe = serde_json::json!({
            "type": "subscribe",
            "product_ids": product_ids,
            "channels": ["ticker"],
        });
        ws_stream
            .send(Message::Text(subscribe.to_string()))
            .await
            .map_err(|e| ExchangeError::WebSocket(Box::new(e)))?;

        tracing::info!(
            exchange = "coinbase",
            count = product_ids.len(),
            "Subscribed to ticker channel"
        );

        Ok(tokio::spawn(Self::message_reader_loop(ws_stream, updates)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(base: &str, quote: &str, code: &str) -> CurrencyPair {
        CurrencyPair::from_codes(base, quote, Some(code.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_list_available_pairs_skips_offline_and_bad_entries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":"BTC-USD","base_currency":"BTC","quote_currency":"USD","status":"online"},
                    {"id":"ETH-EUR","base_currency":"ETH","quote_currency":"EUR","status":"online"},
                    {"id":"OLD-USD","base_currency":"OLD","quote_currency":"USD","status":"delisted"},
                    {"id":"BAD","base_currency":"","quote_currency":"USD","status":"online"}
                ]"#,
            )
            .create_async()
            .await;

        let adapter = CoinbaseAdapter::new(CoinbaseConfig::with_rest_url(server.url()));
        let pairs = adapter.list_available_pairs().await.unwrap();
        mock.assert_async().await;

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].custom_code(), "BTC-USD");
        assert_eq!(pairs[1].custom_code(), "ETH-EUR");
    }

    #[tokio::test]
    async fn test_fetch_prices_tolerates_partial_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products/BTC-USD/ticker")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"price":"64250.10","bid":"64250.00","ask":"64250.20"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/products/ETH-USD/ticker")
            .with_status(500)
            .create_async()
            .await;

        let adapter = CoinbaseAdapter::new(CoinbaseConfig::with_rest_url(server.url()));
        let selected = vec![
            pair("BTC", "USD", "BTC-USD"),
            pair("ETH", "USD", "ETH-USD"),
        ];
        let updates = adapter.fetch_prices(&selected).await.unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].custom_code, "BTC-USD");
        assert_eq!(updates[0].price, 64250.10);
    }

    #[tokio::test]
    async fn test_catalog_load_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products")
            .with_status(503)
            .create_async()
            .await;

        let adapter = CoinbaseAdapter::new(CoinbaseConfig::with_rest_url(server.url()));
        assert!(adapter.list_available_pairs().await.is_err());
    }
}
