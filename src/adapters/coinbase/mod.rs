//! Coinbase Exchange adapter (REST polling + WebSocket ticker stream).

mod adapter;
mod config;
mod types;

pub use adapter::CoinbaseAdapter;
pub use config::CoinbaseConfig;
