//! TrendRecord — one ranked row per ticker.

use serde::{Deserialize, Serialize};

use super::ticker::Ticker;

/// Trend percentage for one lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowTrend {
    pub window: usize,
    pub pct: f64,
}

/// Derived short-term trend figures for one ticker.
///
/// Produced by the trend calculator from a single series and not mutated
/// afterwards; all fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    ticker: Ticker,
    last_close: f64,
    trends: Vec<WindowTrend>,
    avg_volume: f64,
    prior_mean_close: Option<f64>,
    day_change_pct: f64,
}

impl TrendRecord {
    pub fn new(ticker: Ticker, last_close: f64, trends: Vec<WindowTrend>, avg_volume: f64) -> Self {
        Self {
            ticker,
            last_close,
            trends,
            avg_volume,
            prior_mean_close: None,
            day_change_pct: 0.0,
        }
    }

    pub fn with_prior_mean_close(mut self, mean: f64) -> Self {
        self.prior_mean_close = Some(mean);
        self
    }

    pub fn with_day_change_pct(mut self, pct: f64) -> Self {
        self.day_change_pct = pct;
        self
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn last_close(&self) -> f64 {
        self.last_close
    }

    /// Trends in ascending window order.
    pub fn trends(&self) -> &[WindowTrend] {
        &self.trends
    }

    pub fn trend(&self, window: usize) -> Option<f64> {
        self.trends
            .iter()
            .find(|t| t.window == window)
            .map(|t| t.pct)
    }

    pub fn avg_volume(&self) -> f64 {
        self.avg_volume
    }

    /// Mean close of the days before the last one (volume-window sized).
    pub fn prior_mean_close(&self) -> Option<f64> {
        self.prior_mean_close
    }

    pub fn day_change_pct(&self) -> f64 {
        self.day_change_pct
    }
}
