//! Adapter factory for dynamic exchange selection
//!
//! Creates `ExchangeAdapter` instances from an `ExchangeSite`.
//! Uses an enum-based dispatch pattern (no `Box<dyn>`) to preserve
//! monomorphization.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::adapters::binance::{BinanceAdapter, BinanceConfig};
use crate::adapters::coinbase::{CoinbaseAdapter, CoinbaseConfig};
use crate::adapters::errors::ExchangeResult;
use crate::adapters::kraken::{KrakenAdapter, KrakenConfig};
use crate::adapters::traits::ExchangeAdapter;
use crate::adapters::types::{ExchangeSite, PriceUpdate};
use crate::model::CurrencyPair;

// =============================================================================
// AnyAdapter — enum-based dispatch for dynamic exchange selection
// =============================================================================

/// Enum wrapping all concrete adapter types for runtime dispatch.
pub enum AnyAdapter {
    Binance(BinanceAdapter),
    Coinbase(CoinbaseAdapter),
    Kraken(KrakenAdapter),
}

/// Macro to reduce boilerplate for delegating trait methods
macro_rules! delegate {
    ($self:expr, $method:ident ( $($arg:expr),* )) => {
        match $self {
            AnyAdapter::Binance(a) => a.$method($($arg),*),
            AnyAdapter::Coinbase(a) => a.$method($($arg),*),
            AnyAdapter::Kraken(a) => a.$method($($arg),*),
        }
    };
    (await $self:expr, $method:ident ( $($arg:expr),* )) => {
        match $self {
            AnyAdapter::Binance(a) => a.$method($($arg),*).await,
            AnyAdapter::Coinbase(a) => a.$method($($arg),*).await,
            AnyAdapter::Kraken(a) => a.$method($($arg),*).await,
        }
    };
}

#[async_trait]
impl ExchangeAdapter for AnyAdapter {
    fn site(&self) -> ExchangeSite {
        delegate!(self, site())
    }

    fn supports_streaming(&self) -> bool {
        delegate!(self, supports_streaming())
    }

    async fn list_available_pairs(&self) -> ExchangeResult<Vec<CurrencyPair>> {
        delegate!(await self, list_available_pairs())
    }

    async fn fetch_prices(&self, selected: &[CurrencyPair]) -> ExchangeResult<Vec<PriceUpdate>> {
        delegate!(await self, fetch_prices(selected))
    }

    async fn open_stream(
        &self,
        selected: &[CurrencyPair],
        updates: mpsc::UnboundedSender<PriceUpdate>,
    ) -> ExchangeResult<JoinHandle<()>> {
        delegate!(await self, open_stream(selected, updates))
    }
}

// =============================================================================
// Factory Functions
// =============================================================================

/// Create an adapter for a site, configured from the environment.
pub fn create_adapter(site: ExchangeSite) -> AnyAdapter {
    match site {
        ExchangeSite::Binance => AnyAdapter::Binance(BinanceAdapter::new(BinanceConfig::from_env())),
        ExchangeSite::Coinbase => {
            AnyAdapter::Coinbase(CoinbaseAdapter::new(CoinbaseConfig::from_env()))
        }
        ExchangeSite::Kraken => AnyAdapter::Kraken(KrakenAdapter::new(KrakenConfig::from_env())),
    }
}
