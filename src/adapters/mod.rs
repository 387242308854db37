//! Exchange adapters
//!
//! One pluggable adapter per exchange site, all implementing the
//! `ExchangeAdapter` contract: list the pair catalog, fetch prices by
//! polling, or stream them over a persistent connection.

pub mod binance;
pub mod coinbase;
pub mod errors;
pub mod factory;
pub mod kraken;
pub mod shared;
pub mod test_utils;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use binance::{BinanceAdapter, BinanceConfig};
pub use coinbase::{CoinbaseAdapter, CoinbaseConfig};
pub use errors::{ExchangeError, ExchangeResult};
pub use factory::{create_adapter, AnyAdapter};
pub use kraken::{KrakenAdapter, KrakenConfig};
pub use traits::ExchangeAdapter;
pub use types::{ExchangeSite, PriceUpdate};
