//! Ticker symbols and free-text ticker list parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A normalized ticker symbol: trimmed, uppercase, never empty.
///
/// Allowed characters are `A-Z`, `0-9` and `. ^ = -` (class shares, index
/// and currency symbols such as `BRK-B`, `^GSPC`, `EURUSD=X`). Symbols end
/// up in file names and URL paths, so anything else is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickerError {
    #[error("ticker symbol is empty")]
    Empty,

    #[error("ticker symbol '{0}' contains whitespace")]
    Whitespace(String),

    #[error("ticker symbol '{symbol}' contains invalid character '{ch}'")]
    InvalidChar { symbol: String, ch: char },

    #[error("ticker symbol '{0}' has no letters or digits")]
    NoAlphanumeric(String),
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '^' | '=' | '-')
}

impl Ticker {
    pub fn new(raw: &str) -> Result<Self, TickerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TickerError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TickerError::Whitespace(trimmed.to_string()));
        }
        let symbol = trimmed.to_ascii_uppercase();
        if let Some(ch) = symbol.chars().find(|c| !is_symbol_char(*c)) {
            return Err(TickerError::InvalidChar { symbol, ch });
        }
        if !symbol.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(TickerError::NoAlphanumeric(symbol));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}

/// Parse a comma-separated ticker list as typed by a user.
///
/// Entries are trimmed and uppercased; empty entries and repeats are dropped.
/// Entries that are not valid symbols ("BRK B", "../x") are dropped as well,
/// since no provider can resolve them.
pub fn parse_ticker_list(input: &str) -> Vec<Ticker> {
    let mut out: Vec<Ticker> = Vec::new();
    for part in input.split(',') {
        if let Ok(t) = Ticker::new(part) {
            if !out.contains(&t) {
                out.push(t);
            }
        }
    }
    out
}
