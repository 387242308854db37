//! Coinbase Types
//!
//! API response types for the Coinbase Exchange product list, ticker
//! endpoint, and WebSocket ticker channel.
//!
//! Docs: https://docs.cdp.coinbase.com/exchange/docs/websocket-channels

use serde::Deserialize;

// =============================================================================
// REST Types
// =============================================================================

/// One entry from `GET /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinbaseProduct {
    /// Product id, e.g. "BTC-USD" — used as the pair's wire code.
    pub id: String,
    pub base_currency: String,
    pub quote_currency: String,
    /// "online" for tradable products.
    #[serde(default)]
    pub status: String,
}

impl CoinbaseProduct {
    pub fn is_online(&self) -> bool {
        self.status.is_empty() || self.status == "online"
    }
}

/// Response from `GET /products/{id}/ticker`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinbaseTickerResponse {
    /// Last trade price as a string.
    pub price: String,
}

// =============================================================================
// WebSocket Message Types
// =============================================================================

/// Ticker channel event.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinbaseTickerEvent {
    pub product_id: String,
    pub price: String,
}

/// Top-level WebSocket message, tagged by "type". Messages with other
/// tags (heartbeats, errors) fail to parse and are trace-logged by the
/// reader loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum CoinbaseWsMessage {
    #[serde(rename = "ticker")]
    Ticker(CoinbaseTickerEvent),
    #[serde(rename = "subscriptions")]
    Subscriptions(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_parsing() {
        let json = r#"{"id":"BTC-USD","base_currency":"BTC","quote_currency":"USD","status":"online"}"#;
        let product: CoinbaseProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "BTC-USD");
        assert!(product.is_online());
    }

    #[test]
    fn test_delisted_product_detected() {
        let json = r#"{"id":"XRP-USD","base_currency":"XRP","quote_currency":"USD","status":"delisted"}"#;
        let product: CoinbaseProduct = serde_json::from_str(json).unwrap();
        assert!(!product.is_online());
    }

    #[test]
    fn test_ticker_event_parsing() {
        let json = r#"{
            "type": "ticker",
            "sequence": 123456,
            "product_id": "ETH-USD",
            "price": "3120.55",
            "side": "buy"
        }"#;
        let msg: CoinbaseWsMessage = serde_json::from_str(json).unwrap();
        match msg {
            CoinbaseWsMessage::Ticker(event) => {
                assert_eq!(event.product_id, "ETH-USD");
                assert_eq!(event.price, "3120.55");
            }
            other => panic!("Expected Ticker, got {:?}", other),
        }
    }

    #[test]
    fn test_subscriptions_ack_parsing() {
        let json = r#"{"type":"subscriptions","channels":[{"name":"ticker","product_ids":["BTC-USD"]}]}"#;
        let msg: CoinbaseWsMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, CoinbaseWsMessage::Subscriptions(_)));
    }
}
