//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window.
//! Lookback: period - 1 (first value at index period-1).

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let n = closes.len();
        let mut result = vec![None; n];

        if n < self.period {
            return result;
        }

        let mut sum: f64 = closes[..self.period].iter().sum();
        result[self.period - 1] = finite(sum / self.period as f64);

        for i in self.period..n {
            let leaving = closes[i - self.period];
            let entering = closes[i];
            if leaving.is_finite() && sum.is_finite() {
                sum = sum - leaving + entering;
            } else {
                // a non-finite value just left the window: rescan
                sum = closes[(i + 1 - self.period)..=i].iter().sum();
            }
            result[i] = finite(sum / self.period as f64);
        }

        result
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
