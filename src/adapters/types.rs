//! Shared adapter types
//!
//! The exchange site registry and the price update message produced by
//! both fetch paths (polling rounds and streaming connections).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ExchangeSite
// =============================================================================

/// Supported exchange sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeSite {
    Binance,
    Coinbase,
    Kraken,
}

impl ExchangeSite {
    pub const ALL: &'static [ExchangeSite] = &[
        ExchangeSite::Binance,
        ExchangeSite::Coinbase,
        ExchangeSite::Kraken,
    ];

    /// Stable string id used in config files and logs.
    pub fn id(&self) -> &'static str {
        match self {
            ExchangeSite::Binance => "binance",
            ExchangeSite::Coinbase => "coinbase",
            ExchangeSite::Kraken => "kraken",
        }
    }

    pub fn from_id(id: &str) -> Option<ExchangeSite> {
        ExchangeSite::ALL
            .iter()
            .copied()
            .find(|site| site.id() == id.to_ascii_lowercase())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExchangeSite::Binance => "Binance",
            ExchangeSite::Coinbase => "Coinbase",
            ExchangeSite::Kraken => "Kraken",
        }
    }
}

impl fmt::Display for ExchangeSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// =============================================================================
// PriceUpdate
// =============================================================================

/// One (pair, price) observation from an exchange.
///
/// Carries the exchange's wire code, not the normalized pair: ticker
/// payloads echo back the exchange's own product id, so inbound matching
/// happens on that vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    /// Exchange wire code for the pair (e.g. "BTCUSDT").
    pub custom_code: String,
    /// Last trade / ticker price.
    pub price: f64,
    /// When the update was observed locally.
    pub received_at: DateTime<Utc>,
}

impl PriceUpdate {
    pub fn new(custom_code: impl Into<String>, price: f64) -> Self {
        Self {
            custom_code: custom_code.into(),
            price,
            received_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_id_round_trip() {
        for site in ExchangeSite::ALL {
            assert_eq!(ExchangeSite::from_id(site.id()), Some(*site));
        }
    }

    #[test]
    fn test_site_id_is_case_insensitive() {
        assert_eq!(
            ExchangeSite::from_id("Coinbase"),
            Some(ExchangeSite::Coinbase)
        );
        assert_eq!(ExchangeSite::from_id("bitmex"), None);
    }

    #[test]
    fn test_site_serde_form() {
        let json = serde_json::to_string(&ExchangeSite::Kraken).unwrap();
        assert_eq!(json, "\"kraken\"");
        let site: ExchangeSite = serde_json::from_str("\"binance\"").unwrap();
        assert_eq!(site, ExchangeSite::Binance);
    }

    #[test]
    fn test_price_update_carries_wire_code() {
        let update = PriceUpdate::new("XXBTZUSD", 64250.5);
        assert_eq!(update.custom_code, "XXBTZUSD");
        assert_eq!(update.price, 64250.5);
    }
}
