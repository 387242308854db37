//! Binance Types
//!
//! API response types for exchangeInfo, the ticker/price endpoint, and the
//! combined aggTrade stream envelope.
//!
//! Docs: https://binance-docs.github.io/apidocs/spot/en/

use serde::Deserialize;

// =============================================================================
// REST Types
// =============================================================================

/// Response from `GET /api/v3/exchangeInfo` (only the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceExchangeInfo {
    pub symbols: Vec<BinanceSymbol>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceSymbol {
    /// Wire code, e.g. "BTCUSDT".
    pub symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(default)]
    pub status: String,
}

impl BinanceSymbol {
    pub fn is_trading(&self) -> bool {
        self.status.is_empty() || self.status == "TRADING"
    }
}

/// One entry from `GET /api/v3/ticker/price` (single object or array).
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceTickerPrice {
    pub symbol: String,
    pub price: String,
}

// =============================================================================
// WebSocket Message Types
// =============================================================================

/// Combined-stream envelope: `{"stream":"btcusdt@aggTrade","data":{...}}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BinanceStreamEnvelope {
    pub data: BinanceAggTrade,
}

/// Aggregate trade event payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BinanceAggTrade {
    /// Symbol, e.g. "BTCUSDT".
    #[serde(rename = "s")]
    pub symbol: String,
    /// Trade price as a string.
    #[serde(rename = "p")]
    pub price: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_info_parsing() {
        let json = r#"{
            "timezone": "UTC",
            "symbols": [
                {"symbol":"BTCUSDT","baseAsset":"BTC","quoteAsset":"USDT","status":"TRADING"},
                {"symbol":"VENBTC","baseAsset":"VEN","quoteAsset":"BTC","status":"BREAK"}
            ]
        }"#;
        let info: BinanceExchangeInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.symbols.len(), 2);
        assert!(info.symbols[0].is_trading());
        assert!(!info.symbols[1].is_trading());
    }

    #[test]
    fn test_ticker_price_array_parsing() {
        let json = r#"[{"symbol":"BTCUSDT","price":"64000.01"},{"symbol":"ETHUSDT","price":"3100.44"}]"#;
        let tickers: Vec<BinanceTickerPrice> = serde_json::from_str(json).unwrap();
        assert_eq!(tickers.len(), 2);
        assert_eq!(tickers[0].symbol, "BTCUSDT");
    }

    #[test]
    fn test_agg_trade_envelope_parsing() {
        let json = r#"{
            "stream": "btcusdt@aggTrade",
            "data": {"e":"aggTrade","E":1700000000000,"s":"BTCUSDT","p":"64123.45","q":"0.5"}
        }"#;
        let envelope: BinanceStreamEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.symbol, "BTCUSDT");
        assert_eq!(envelope.data.price, "64123.45");
    }
}
