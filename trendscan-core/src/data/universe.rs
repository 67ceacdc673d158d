//! Universe configuration — named fixed ticker lists.
//!
//! Stored as TOML:
//!
//! ```toml
//! [lists]
//! tech = ["AAPL", "MSFT"]
//! ```
//!
//! Symbols are normalized on load, so lowercase entries are fine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::domain::Ticker;

/// Name of the list used when the user picks none.
pub const DEFAULT_LIST: &str = "tech";

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("read universe file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse universe TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize universe: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Named ticker lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub lists: BTreeMap<String, Vec<Ticker>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, UniverseError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn list(&self, name: &str) -> Option<&[Ticker]> {
        self.lists.get(name).map(|v| v.as_slice())
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.lists.keys().map(|s| s.as_str()).collect()
    }

    /// Built-in lists: large-cap tech (the default), a few sector ETFs and
    /// broad index ETFs.
    pub fn builtin() -> Self {
        let mut lists = BTreeMap::new();
        lists.insert(
            DEFAULT_LIST.to_string(),
            tickers(&["AAPL", "MSFT", "GOOGL", "NVDA", "AMZN", "TSLA", "META"]),
        );
        lists.insert(
            "sectors".to_string(),
            tickers(&["XLK", "XLF", "XLE", "XLV", "XLY", "XLP", "XLI", "XLU"]),
        );
        lists.insert(
            "indices".to_string(),
            tickers(&["SPY", "QQQ", "IWM", "DIA"]),
        );
        Self { lists }
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::builtin()
    }
}

fn tickers(symbols: &[&str]) -> Vec<Ticker> {
    symbols.iter().filter_map(|s| Ticker::new(s).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_default_list() {
        let u = Universe::builtin();
        let tech = u.list(DEFAULT_LIST).unwrap();
        assert_eq!(tech.len(), 7);
        assert_eq!(tech[0].as_str(), "AAPL");
        assert!(u.list_names().contains(&"indices"));
    }

    #[test]
    fn toml_roundtrip() {
        let u = Universe::builtin();
        let parsed = Universe::from_toml(&u.to_toml().unwrap()).unwrap();
        assert_eq!(u, parsed);
    }

    #[test]
    fn symbols_normalized_on_load() {
        let u = Universe::from_toml("[lists]\nmine = [\"aapl\", \" tsla \"]\n").unwrap();
        let mine: Vec<&str> = u.list("mine").unwrap().iter().map(|t| t.as_str()).collect();
        assert_eq!(mine, vec!["AAPL", "TSLA"]);
    }

    #[test]
    fn empty_symbol_rejected() {
        assert!(Universe::from_toml("[lists]\nbad = [\"\"]\n").is_err());
    }

    #[test]
    fn unknown_list_is_none() {
        assert!(Universe::builtin().list("nope").is_none());
    }
}
