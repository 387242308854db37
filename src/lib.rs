//! cointick — near-real-time currency pair price feed
//!
//! Aggregates spot prices for user-selected currency pairs from one
//! exchange at a time:
//! - Exchange adapters (Coinbase, Binance, Kraken) over REST + WebSocket
//! - Currency/pair normalization across exchange naming schemes
//! - Coordinator state machine with polling and streaming price delivery

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod model;

pub use error::{AppError, AppResult};
