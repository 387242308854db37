//! Kraken Types
//!
//! Kraken wraps every public endpoint in `{"error":[...],"result":{...}}`
//! and prefixes asset codes with "X" (crypto) / "Z" (fiat), e.g. the
//! BTC/USD pair is keyed "XXBTZUSD" with base "XXBT" and quote "ZUSD".
//!
//! Docs: https://docs.kraken.com/api/docs/rest-api/get-ticker-information

use std::collections::HashMap;

use serde::Deserialize;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

/// Standard Kraken response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenResponse<T> {
    #[serde(default)]
    pub error: Vec<String>,
    pub result: Option<T>,
}

impl<T> KrakenResponse<T> {
    /// Unwrap the result, tolerating per-pair errors as long as a usable
    /// result body is present.
    pub fn into_result(self) -> ExchangeResult<T> {
        if !self.error.is_empty() {
            tracing::warn!(exchange = "kraken", errors = ?self.error, "API reported errors");
        }
        self.result.ok_or_else(|| {
            ExchangeError::InvalidResponse(format!("kraken error: {}", self.error.join(", ")))
        })
    }
}

/// One entry from `GET /0/public/AssetPairs`.
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenAssetPair {
    /// Base asset in Kraken vocabulary, e.g. "XXBT".
    pub base: String,
    /// Quote asset in Kraken vocabulary, e.g. "ZUSD".
    pub quote: String,
}

pub type KrakenAssetPairs = HashMap<String, KrakenAssetPair>;

/// One entry from `GET /0/public/Ticker` (only the last-trade field).
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenTicker {
    /// Last trade closed: [price, lot volume].
    pub c: Vec<String>,
}

pub type KrakenTickers = HashMap<String, KrakenTicker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_pairs_parsing() {
        let json = r#"{
            "error": [],
            "result": {
                "XXBTZUSD": {"base":"XXBT","quote":"ZUSD","pair_decimals":1},
                "XETHZEUR": {"base":"XETH","quote":"ZEUR","pair_decimals":2}
            }
        }"#;
        let response: KrakenResponse<KrakenAssetPairs> = serde_json::from_str(json).unwrap();
        let pairs = response.into_result().unwrap();
        assert_eq!(pairs["XXBTZUSD"].base, "XXBT");
        assert_eq!(pairs["XETHZEUR"].quote, "ZEUR");
    }

    #[test]
    fn test_ticker_parsing() {
        let json = r#"{
            "error": [],
            "result": {
                "XXBTZUSD": {"a":["64001.0","1","1.0"],"b":["64000.0","2","2.0"],"c":["64000.5","0.01"]}
            }
        }"#;
        let response: KrakenResponse<KrakenTickers> = serde_json::from_str(json).unwrap();
        let tickers = response.into_result().unwrap();
        assert_eq!(tickers["XXBTZUSD"].c[0], "64000.5");
    }

    #[test]
    fn test_error_without_result_fails() {
        let json = r#"{"error":["EQuery:Unknown asset pair"],"result":null}"#;
        let response: KrakenResponse<KrakenTickers> = serde_json::from_str(json).unwrap();
        assert!(response.into_result().is_err());
    }
}
