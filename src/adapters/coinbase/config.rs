//! Coinbase Configuration

// =============================================================================
// Constants
// =============================================================================

const REST_URL: &str = "https://api.exchange.coinbase.com";
const WS_URL: &str = "wss://ws-feed.exchange.coinbase.com";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for Coinbase Exchange public market data endpoints.
#[derive(Debug, Clone)]
pub struct CoinbaseConfig {
    pub rest_url: String,
    pub ws_url: String,
}

impl Default for CoinbaseConfig {
    fn default() -> Self {
        Self {
            rest_url: REST_URL.to_string(),
            ws_url: WS_URL.to_string(),
        }
    }
}

impl CoinbaseConfig {
    /// Create configuration from environment variables. The URL overrides
    /// exist for pointing tests at a local mock server.
    pub fn from_env() -> Self {
        Self {
            rest_url: std::env::var("COINBASE_REST_URL").unwrap_or_else(|_| REST_URL.to_string()),
            ws_url: std::env::var("COINBASE_WS_URL").unwrap_or_else(|_| WS_URL.to_string()),
        }
    }

    /// Configuration pointing at a custom REST endpoint (tests).
    pub fn with_rest_url(rest_url: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            ..Self::default()
        }
    }
}
