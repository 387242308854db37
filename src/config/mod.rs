//! Configuration: persisted ticker settings and logging setup

pub mod logging;
pub mod store;

pub use logging::init_logging;
pub use store::{TickerConfig, CONFIG_PATH_ENV};
