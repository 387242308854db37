//! Kraken Configuration

const REST_URL: &str = "https://api.kraken.com";

/// Configuration for Kraken public market data endpoints.
#[derive(Debug, Clone)]
pub struct KrakenConfig {
    pub rest_url: String,
}

impl Default for KrakenConfig {
    fn default() -> Self {
        Self {
            rest_url: REST_URL.to_string(),
        }
    }
}

impl KrakenConfig {
    /// Create configuration from environment variables. The URL override
    /// exists for pointing tests at a local mock server.
    pub fn from_env() -> Self {
        Self {
            rest_url: std::env::var("KRAKEN_REST_URL").unwrap_or_else(|_| REST_URL.to_string()),
        }
    }

    /// Configuration pointing at a custom REST endpoint (tests).
    pub fn with_rest_url(rest_url: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
        }
    }
}
