//! Kraken adapter (polling only).

mod adapter;
mod config;
mod types;

pub use adapter::KrakenAdapter;
pub use config::KrakenConfig;
