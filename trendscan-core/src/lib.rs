//! TrendScan Core — price series, validation, trend calculation, data sources.
//!
//! This crate contains the deterministic part of a scan:
//! - Domain types (tickers, price series, trend records)
//! - Series validation against the longest lookback window
//! - Trend calculator (per-window trend percentages, average volume)
//! - Close-price indicators (SMA, rolling trend) and chart series
//! - Market data providers (Yahoo Finance, local files, synthetic)
//! - Deterministic seed derivation

pub mod chart;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod rng;
pub mod trend;
pub mod validate;

pub use chart::ChartSeries;
pub use domain::{parse_ticker_list, Observation, PriceSeries, Ticker, TrendRecord, WindowTrend};
pub use trend::{TrendCalculator, TrendError};
pub use validate::{required_length, validate, ValidationError};
