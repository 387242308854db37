//! Binance Configuration

// =============================================================================
// Constants
// =============================================================================

const REST_URL: &str = "https://api.binance.com";
const WS_URL: &str = "wss://stream.binance.com:9443";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for Binance public market data endpoints.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub rest_url: String,
    pub ws_url: String,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            rest_url: REST_URL.to_string(),
            ws_url: WS_URL.to_string(),
        }
    }
}

impl BinanceConfig {
    /// Create configuration from environment variables. The URL overrides
    /// exist for pointing tests at a local mock server.
    pub fn from_env() -> Self {
        Self {
            rest_url: std::env::var("BINANCE_REST_URL").unwrap_or_else(|_| REST_URL.to_string()),
            ws_url: std::env::var("BINANCE_WS_URL").unwrap_or_else(|_| WS_URL.to_string()),
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
