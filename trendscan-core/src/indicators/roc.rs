//! Trend percentage (rate of change against a lookback base).
//!
//! TREND_w[t] = (close[t] - close[t-w-1]) / close[t-w-1] * 100
//!
//! The base is the close `w + 1` rows before row `t`, so a 5-day trend on
//! the newest row compares against the close six sessions earlier.
//! Lookback: window + 1.

/// Unrounded trend percentage of the newest close against the close
/// `window + 1` rows earlier.
///
/// `None` when there are not enough closes, or the base is not a positive
/// finite price.
pub fn raw_trend(closes: &[f64], window: usize) -> Option<f64> {
    let n = closes.len();
    let offset = window + 1;
    if n <= offset {
        return None;
    }
    pct_change(closes[n - 1 - offset], closes[n - 1])
}

/// (curr - base) / base * 100, undefined unless the base is a positive
/// finite price.
pub fn pct_change(base: f64, curr: f64) -> Option<f64> {
    if !base.is_finite() || !curr.is_finite() || base <= 0.0 {
        return None;
    }
    Some((curr - base) / base * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    const SAMPLE: [f64; 12] = [
        100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0, 107.0, 108.0, 109.0, 110.0, 120.0,
    ];

    #[test]
    fn raw_trend_uses_close_window_plus_one_back() {
        // 5-day: base is 105 (six rows before 120)
        assert_approx(
            raw_trend(&SAMPLE, 5).unwrap(),
            (120.0 - 105.0) / 105.0 * 100.0,
            DEFAULT_EPSILON,
        );
        // 10-day: base is 100 (eleven rows before 120)
        assert_approx(raw_trend(&SAMPLE, 10).unwrap(), 20.0, DEFAULT_EPSILON);
    }

    #[test]
    fn raw_trend_needs_window_plus_two_closes() {
        assert!(raw_trend(&SAMPLE[1..], 10).is_none());
        assert!(raw_trend(&SAMPLE, 11).is_none());
    }

    #[test]
    fn zero_base_is_undefined() {
        assert!(pct_change(0.0, 10.0).is_none());
        assert!(raw_trend(&[0.0, 1.0, 2.0], 1).is_none());
    }

    #[test]
    fn negative_base_is_undefined() {
        assert!(pct_change(-100.0, 120.0).is_none());
        let mut closes = SAMPLE;
        closes[5] = -100.0;
        assert!(raw_trend(&closes, 5).is_none());
    }

    #[test]
    fn negative_trend() {
        assert_approx(pct_change(100.0, 90.0).unwrap(), -10.0, DEFAULT_EPSILON);
    }
}
