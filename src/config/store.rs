//! Persisted ticker settings
//!
//! The user-visible knobs (exchange, update interval, watched pairs) live
//! in one small YAML file, written back whenever any of them change.
//! Pairs are persisted in their normalized "BASE-QUOTE" form, never by
//! exchange wire code, so the file stays valid across exchange switches.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::ExchangeSite;
use crate::core::{MAX_SELECTED_PAIRS, REAL_TIME_UPDATE_INTERVAL};
use crate::error::{AppError, AppResult};
use crate::model::CurrencyPair;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "COINTICK_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "cointick.yaml";

/// Root persisted configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Active exchange site
    pub exchange_site: ExchangeSite,
    /// Polling interval in seconds; `REAL_TIME_UPDATE_INTERVAL` requests
    /// streaming where supported
    pub update_interval_secs: u64,
    /// Watched pairs as "BASE-QUOTE" strings
    pub selected_pairs: Vec<String>,
    /// Where to write changes back; `None` keeps the config in memory
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            exchange_site: ExchangeSite::Coinbase,
            update_interval_secs: REAL_TIME_UPDATE_INTERVAL,
            selected_pairs: Vec::new(),
            path: None,
        }
    }
}

impl TickerConfig {
    /// Config file path: `COINTICK_CONFIG` if set, else `cointick.yaml`
    /// in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load from a file, falling back to defaults when it does not exist
    /// yet. The path is remembered for later saves either way.
    pub fn load_or_default(path: &Path) -> AppResult<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            let config: TickerConfig = serde_yaml::from_str(&raw)?;
            config.validate()?;
            config
        } else {
            tracing::info!(path = %path.display(), "No config file; starting with defaults");
            TickerConfig::default()
        };
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Write the current settings back to the remembered path. A config
    /// that was never given a path is in-memory only and saves are no-ops.
    pub fn save(&self) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_yaml::to_string(self)?;
        std::fs::write(path, raw)?;
        tracing::debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.update_interval_secs == 0 {
            return Err(AppError::Config(
                "update_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.selected_pairs.len() > MAX_SELECTED_PAIRS {
            return Err(AppError::Config(format!(
                "at most {} selected pairs are supported (got {})",
                MAX_SELECTED_PAIRS,
                self.selected_pairs.len()
            )));
        }
        Ok(())
    }

    /// Parse the persisted pairs into a reconciliation hint. Entries that
    /// no longer parse are dropped with a warning rather than failing the
    /// whole load.
    pub fn selection_hint(&self) -> Vec<CurrencyPair> {
        self.selected_pairs
            .iter()
            .filter_map(|code| match CurrencyPair::from_code(code) {
                Some(pair) => Some(pair),
                None => {
                    tracing::warn!(code = %code, "Dropping unparseable persisted pair");
                    None
                }
            })
            .collect()
    }
}
