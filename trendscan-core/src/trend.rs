//! Trend calculator — turns one validated price series into a TrendRecord.
//!
//! For each lookback window `w`:
//!
//! ```text
//! trend_w = (last_close - base_w) / base_w * 100
//! base_w  = close w + 1 rows before the last row
//! ```
//!
//! rounded half-to-even to 2 decimals. Average volume is the mean over the
//! newest `volume_window` rows. A base that is not a positive price (zero,
//! negative, NaN) makes the whole record undefined;
//! the ticker is excluded instead of reporting a bogus trend.

use thiserror::Error;

use crate::domain::{PriceSeries, TrendRecord, WindowTrend};
use crate::indicators::roc::{pct_change, raw_trend};
use crate::indicators::{round_half_even, round_pct};
use crate::validate::{required_length, validate, ValidationError};

/// Default lookback windows: 5 and 10 sessions.
pub const DEFAULT_WINDOWS: [usize; 2] = [5, 10];

/// Default number of trailing sessions averaged for volume.
pub const DEFAULT_VOLUME_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("base close for the {window}-day window is not a positive price")]
    ZeroBase { window: usize },

    #[error("last close is not a positive finite number: {close}")]
    InvalidClose { close: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorConfigError {
    #[error("at least one lookback window is required")]
    NoWindows,

    #[error("lookback windows must be >= 1")]
    ZeroWindow,

    #[error("volume window must be >= 1")]
    ZeroVolumeWindow,
}

/// Computes TrendRecords for a fixed set of lookback windows.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendCalculator {
    windows: Vec<usize>,
    volume_window: usize,
    required: usize,
}

impl TrendCalculator {
    /// Windows are sorted ascending and de-duplicated.
    pub fn new(windows: &[usize], volume_window: usize) -> Result<Self, CalculatorConfigError> {
        if windows.is_empty() {
            return Err(CalculatorConfigError::NoWindows);
        }
        if windows.contains(&0) {
            return Err(CalculatorConfigError::ZeroWindow);
        }
        if volume_window == 0 {
            return Err(CalculatorConfigError::ZeroVolumeWindow);
        }
        let mut windows = windows.to_vec();
        windows.sort_unstable();
        windows.dedup();
        let required = required_length(&windows, volume_window);
        Ok(Self {
            windows,
            volume_window,
            required,
        })
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    pub fn shortest_window(&self) -> usize {
        self.windows[0]
    }

    pub fn longest_window(&self) -> usize {
        self.windows[self.windows.len() - 1]
    }

    pub fn volume_window(&self) -> usize {
        self.volume_window
    }

    /// Minimum series length this calculator accepts.
    pub fn required_length(&self) -> usize {
        self.required
    }

    /// Compute the record for one series.
    pub fn compute(&self, series: &PriceSeries) -> Result<TrendRecord, TrendError> {
        validate(series, self.required)?;

        let obs = series.observations();
        let last_close = obs[obs.len() - 1].close;
        if !(last_close.is_finite() && last_close > 0.0) {
            return Err(TrendError::InvalidClose { close: last_close });
        }

        let closes = series.closes();
        let mut trends = Vec::with_capacity(self.windows.len());
        for &window in &self.windows {
            // length is validated above, so None means a bad base
            let pct = raw_trend(&closes, window).ok_or(TrendError::ZeroBase { window })?;
            trends.push(WindowTrend {
                window,
                pct: round_pct(pct),
            });
        }

        let recent = series.tail(self.volume_window);
        let avg_volume =
            recent.iter().map(|o| o.volume as f64).sum::<f64>() / recent.len() as f64;

        let mut record = TrendRecord::new(series.ticker().clone(), last_close, trends, avg_volume);

        // Closes before the last one, at most volume_window of them.
        let before_last = &obs[..obs.len() - 1];
        let prior = &before_last[before_last.len().saturating_sub(self.volume_window)..];
        if !prior.is_empty() {
            let mean = prior.iter().map(|o| o.close).sum::<f64>() / prior.len() as f64;
            if mean.is_finite() {
                record = record.with_prior_mean_close(round_half_even(mean, 2));
            }
        }
        if let Some(prev) = series.from_end(1) {
            if let Some(change) = pct_change(prev.close, last_close) {
                record = record.with_day_change_pct(round_pct(change));
            }
        }

        Ok(record)
    }
}

impl Default for TrendCalculator {
    fn default() -> Self {
        let windows = DEFAULT_WINDOWS.to_vec();
        Self {
            required: required_length(&windows, DEFAULT_VOLUME_WINDOW),
            windows,
            volume_window: DEFAULT_VOLUME_WINDOW,
        }
    }
}
