//! Close-price indicators used for ranking and charting.
//!
//! Indicators work on a plain close-price slice (oldest first) and return one
//! value per input row. Rows inside the warmup period have no value (`None`)
//! rather than a partial-window estimate.

pub mod roc;
pub mod sma;

pub use roc::{pct_change, raw_trend};
pub use sma::Sma;

/// A single-series indicator over close prices.
pub trait Indicator: Send + Sync {
    fn name(&self) -> &str;

    /// Number of leading rows that cannot produce a value.
    fn lookback(&self) -> usize;

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>>;
}

/// Round to `dp` decimal places, ties to even.
///
/// Non-finite input is returned unchanged.
pub fn round_half_even(value: f64, dp: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(dp);
    let scaled = value * factor;
    let floor = scaled.floor();
    let diff = scaled - floor;
    let rounded = if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    rounded / factor
}

/// Round a percentage for display and ranking (2 decimals).
pub fn round_pct(value: f64) -> f64 {
    round_half_even(value, 2)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
