//! Serializable scan configuration.
//!
//! One parameterized scan replaces the per-variant scripts: the lookback
//! windows, volume window, ticker source and ranking window are all options.
//! Every field has a default, so an empty TOML file is a valid config.
//!
//! ```toml
//! lookback_windows = [5, 10]
//! volume_window = 5
//! history_days = 30
//! provider = "yahoo"
//! rank_by = "shortest"          # or "longest", or { window = 10 }
//! enrich = false
//! seed = 42
//!
//! [ticker_source]
//! kind = "free_text"
//! text = "aapl, msft, nvda"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ranker::RankBy;
use trendscan_core::data::{Universe, DEFAULT_LIST};
use trendscan_core::domain::{parse_ticker_list, Ticker};
use trendscan_core::rng::DEFAULT_SEED;
use trendscan_core::trend::{
    CalculatorConfigError, TrendCalculator, DEFAULT_VOLUME_WINDOW, DEFAULT_WINDOWS,
};

/// Calendar days of history requested by default. Comfortably more than the
/// 12 sessions the default windows need, across weekends and holidays.
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Calculator(#[from] CalculatorConfigError),

    #[error("rank window {0} is not one of the lookback windows")]
    RankWindowMissing(usize),

    #[error("unknown ticker list '{name}' (available: {available})")]
    UnknownList { name: String, available: String },

    #[error("no tickers to scan")]
    NoTickers,

    #[error("history of {days} calendar days cannot hold {required} sessions")]
    HistoryTooShort { days: u32, required: usize },

    #[error("the file provider needs a data directory")]
    MissingDataDir,
}

/// Where the ticker set comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickerSource {
    /// A named list from the universe.
    FixedList { name: String },
    /// Comma-separated symbols as typed by a user.
    FreeText { text: String },
}

impl Default for TickerSource {
    fn default() -> Self {
        Self::FixedList {
            name: DEFAULT_LIST.to_string(),
        }
    }
}

/// Which market data provider to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    File,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub lookback_windows: Vec<usize>,
    pub volume_window: usize,
    pub ticker_source: TickerSource,
    pub rank_by: RankBy,
    pub history_days: u32,
    pub provider: ProviderKind,
    pub data_dir: Option<PathBuf>,
    pub enrich: bool,
    pub seed: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lookback_windows: DEFAULT_WINDOWS.to_vec(),
            volume_window: DEFAULT_VOLUME_WINDOW,
            ticker_source: TickerSource::default(),
            rank_by: RankBy::default(),
            history_days: DEFAULT_HISTORY_DAYS,
            provider: ProviderKind::default(),
            data_dir: None,
            enrich: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl ScanConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the trend calculator, checking the window settings.
    pub fn calculator(&self) -> Result<TrendCalculator, ConfigError> {
        let calc = TrendCalculator::new(&self.lookback_windows, self.volume_window)?;
        if let RankBy::Window(w) = self.rank_by {
            if !calc.windows().contains(&w) {
                return Err(ConfigError::RankWindowMissing(w));
            }
        }
        Ok(calc)
    }

    /// Check everything that can be checked before any data is fetched.
    pub fn validate(&self) -> Result<TrendCalculator, ConfigError> {
        let calc = self.calculator()?;
        if (self.history_days as usize) < calc.required_length() {
            return Err(ConfigError::HistoryTooShort {
                days: self.history_days,
                required: calc.required_length(),
            });
        }
        if self.provider == ProviderKind::File && self.data_dir.is_none() {
            return Err(ConfigError::MissingDataDir);
        }
        Ok(calc)
    }

    /// Resolve the ticker source to a concrete, normalized ticker list.
    pub fn resolve_tickers(&self, universe: &Universe) -> Result<Vec<Ticker>, ConfigError> {
        let tickers = match &self.ticker_source {
            TickerSource::FixedList { name } => universe
                .list(name)
                .ok_or_else(|| ConfigError::UnknownList {
                    name: name.clone(),
                    available: universe.list_names().join(", "),
                })?
                .to_vec(),
            TickerSource::FreeText { text } => parse_ticker_list(text),
        };
        if tickers.is_empty() {
            return Err(ConfigError::NoTickers);
        }
        Ok(tickers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let cfg = ScanConfig::from_toml("").unwrap();
        assert_eq!(cfg, ScanConfig::default());
        assert_eq!(cfg.lookback_windows, vec![5, 10]);
        assert_eq!(cfg.volume_window, 5);
    }

    #[test]
    fn full_toml_parses() {
        let cfg = ScanConfig::from_toml(
            r#"
            lookback_windows = [3, 7]
            volume_window = 4
            history_days = 45
            provider = "synthetic"
            rank_by = { window = 7 }
            enrich = true
            seed = 9

            [ticker_source]
            kind = "free_text"
            text = "aapl, msft"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.lookback_windows, vec![3, 7]);
        assert_eq!(cfg.rank_by, RankBy::Window(7));
        assert_eq!(cfg.provider, ProviderKind::Synthetic);
        assert!(cfg.enrich);
        assert_eq!(
            cfg.ticker_source,
            TickerSource::FreeText {
                text: "aapl, msft".into()
            }
        );
        let calc = cfg.validate().unwrap();
        assert_eq!(calc.required_length(), 9);
    }

    #[test]
    fn rank_window_must_exist() {
        let cfg = ScanConfig {
            rank_by: RankBy::Window(20),
            ..Default::default()
        };
        assert!(matches!(
            cfg.calculator(),
            Err(ConfigError::RankWindowMissing(20))
        ));
    }

    #[test]
    fn zero_window_rejected() {
        let cfg = ScanConfig {
            lookback_windows: vec![0],
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Calculator(CalculatorConfigError::ZeroWindow))
        ));
    }

    #[test]
    fn history_must_cover_lookback() {
        let cfg = ScanConfig {
            history_days: 10,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::HistoryTooShort {
                days: 10,
                required: 12
            })
        ));
    }

    #[test]
    fn file_provider_needs_dir() {
        let cfg = ScanConfig {
            provider: ProviderKind::File,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingDataDir)));
    }

    #[test]
    fn resolves_fixed_list() {
        let tickers = ScanConfig::default()
            .resolve_tickers(&Universe::builtin())
            .unwrap();
        assert_eq!(tickers.len(), 7);
    }

    #[test]
    fn resolves_free_text() {
        let cfg = ScanConfig {
            ticker_source: TickerSource::FreeText {
                text: " tsla,, aapl ".into(),
            },
            ..Default::default()
        };
        let tickers = cfg.resolve_tickers(&Universe::builtin()).unwrap();
        let syms: Vec<&str> = tickers.iter().map(|t| t.as_str()).collect();
        assert_eq!(syms, vec!["TSLA", "AAPL"]);
    }

    #[test]
    fn unknown_list_and_empty_text_rejected() {
        let unknown = ScanConfig {
            ticker_source: TickerSource::FixedList {
                name: "nope".into(),
            },
            ..Default::default()
        };
        assert!(matches!(
            unknown.resolve_tickers(&Universe::builtin()),
            Err(ConfigError::UnknownList { .. })
        ));

        let empty = ScanConfig {
            ticker_source: TickerSource::FreeText { text: " , ".into() },
            ..Default::default()
        };
        assert!(matches!(
            empty.resolve_tickers(&Universe::builtin()),
            Err(ConfigError::NoTickers)
        ));
    }
}
