//! Binance Adapter Implementation
//!
//! Catalog from exchangeInfo; polling uses the batched all-tickers call
//! when more than one pair is selected; real-time mode uses one combined
//! aggTrade stream for all selected symbols.

use std::collections::HashSet;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::shared::connect_tls;
use crate::adapters::traits::ExchangeAdapter;
use crate::adapters::types::{ExchangeSite, PriceUpdate};
use crate::model::CurrencyPair;

use super::config::BinanceConfig;
use super::types::{BinanceExchangeInfo, BinanceStreamEnvelope, BinanceTickerPrice};

/// Binance adapter (streaming-capable, batched polling).
pub struct BinanceAdapter {
    config: BinanceConfig,
    client: reqwest::Client,
}

impl BinanceAdapter {
    pub fn new(config: BinanceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn updates_from_tickers(
        tickers: Vec<BinanceTickerPrice>,
        selected_codes: &HashSet<&str>,
    ) -> Vec<PriceUpdate> {
        tickers
            .into_iter()
            .filter(|ticker| selected_codes.contains(ticker.symbol.as_str()))
            .filter_map(|ticker| match ticker.price.parse::<f64>() {
                Ok(price) => Some(PriceUpdate::new(&ticker.symbol, price)),
                Err(e) => {
                    tracing::warn!(
                        exchange = "binance",
                        symbol = %ticker.symbol,
                        error = %e,
                        "Unparseable ticker price"
                    );
                    None
                }
            })
            .collect()
    }

    async fn message_reader_loop(
        mut ws_stream: crate::adapters::shared::TlsWebSocketStream,
        updates: mpsc::UnboundedSender<PriceUpdate>,
    ) {
        while let Some(msg_result) = ws_stream.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<BinanceStreamEnvelope>(&text) {
                        Ok(envelope) => match envelope.data.price.parse::<f64>() {
                            Ok(price) => {
                                let update = PriceUpdate::new(&envelope.data.symbol, price);
                                if updates.send(update).is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!(
                                exchange = "binance",
                                symbol = %envelope.data.symbol,
                                error = %e,
                                "Unparseable trade price"
                            ),
                        },
                        Err(_) => {
                            tracing::trace!(
                                exchange = "binance",
                                message = %text,
                                "Unknown message format"
                            );
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(exchange = "binance", "WebSocket closed by server");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(exchange = "binance", error = %e, "WebSocket read error");
                    break;
                }
            }
        }
        tracing::info!(exchange = "binance", "Trade stream ended");
    }
}

#[async_trait]
impl ExchangeAdapter for BinanceAdapter {
    fn site(&self) -> ExchangeSite {
        ExchangeSite::Binance
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    async fn list_available_pairs(&self) -> ExchangeResult<Vec<CurrencyPair>> {
        let url = format!("{}/api/v3/exchangeInfo", self.config.rest_url);
        let info: BinanceExchangeInfo = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let pairs = info
            .symbols
            .into_iter()
            .filter(super::types::BinanceSymbol::is_trading)
            .filter_map(|symbol| {
                let pair = CurrencyPair::from_codes(
                    &symbol.base_asset,
                    &symbol.quote_asset,
                    Some(symbol.symbol.clone()),
                );
                if pair.is_none() {
                    tracing::debug!(
                        exchange = "binance",
                        symbol = %symbol.symbol,
                        "Skipping symbol that failed to normalize"
                    );
                }
                pair
            })
            .collect();
        Ok(pairs)
    }

    /// One pair: single-symbol query. More: the batched all-tickers call,
    /// filtered down to the selected wire codes. A symbol missing from the
    /// batch simply yields no update for that pair this round.
    async fn fetch_prices(&self, selected: &[CurrencyPair]) -> ExchangeResult<Vec<PriceUpdate>> {
        let selected_codes: HashSet<&str> =
            selected.iter().map(|pair| pair.custom_code()).collect();

        let tickers: Vec<BinanceTickerPrice> = if let [only] = selected {
            let url = format!(
                "{}/api/v3/ticker/price?symbol={}",
                self.config.rest_url,
                only.custom_code()
            );
            let ticker: BinanceTickerPrice = self
                .client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            vec![ticker]
        } else {
            let url = format!("{}/api/v3/ticker/price", self.config.rest_url);
            self.client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?
        };

        Ok(Self::updates_from_tickers(tickers, &selected_codes))
    }

    async fn open_stream(
        &self,
        selected: &[CurrencyPair],
        updates: mpsc::UnboundedSender<PriceUpdate>,
    ) -> ExchangeResult<JoinHandle<()>> {
        let streams: Vec<String> = selected
            .iter()
            .map(|pair| format!("{}@aggTrade", pair.custom_code().to_ascii_lowercase()))
            .collect();
        let url = format!("{}/stream?streams={}", self.config.ws_url, streams.join("/"));

        let ws_stream = connect_tls(&url).await?;
        tracing::info!(
            exchange = "binance",
            count = selected.len(),
            "Connected to combined aggTrade stream"
        );

        Ok(tokio::spawn(Self::message_reader_loop(ws_stream, updates)))
    }
}
