//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, local
//! CSV/Parquet files, synthetic data) so the scan pipeline can swap
//! implementations and mock them in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceSeries, Ticker};

/// Structured error types for data operations.
///
/// Every variant is a per-ticker condition: the pipeline turns it into an
/// exclusion and carries on with the next ticker.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data file for '{symbol}' in {dir}")]
    NoDataFile { symbol: String, dir: String },

    #[error("file read error: {0}")]
    FileError(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single ticker.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub series: PriceSeries,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvFile,
    ParquetFile,
    Synthetic,
}

/// Trait for market data sources.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily close/volume observations for a ticker over a date range
    /// (both ends inclusive).
    fn fetch(&self, ticker: &Ticker, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}
