//! Binance adapter (batched REST polling + combined aggTrade stream).

mod adapter;
mod config;
mod types;

pub use adapter::BinanceAdapter;
pub use config::BinanceConfig;
