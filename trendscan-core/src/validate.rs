//! Series validation — guards the trend calculator against short history.
//!
//! New listings, delisted symbols and provider gaps all show up as series
//! that are empty or too short for the longest lookback. Those must be
//! rejected before any index arithmetic happens.

use thiserror::Error;

use crate::domain::PriceSeries;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("series is empty")]
    Empty,

    #[error("series has {len} observations, need at least {required}")]
    TooShort { len: usize, required: usize },
}

/// Minimum number of observations needed for the given lookback windows and
/// volume-averaging window.
///
/// A window `w` compares the last close with the close `w + 1` rows earlier,
/// so it needs `w + 2` rows: windows {5, 10} need 12. With no windows only
/// the volume window counts.
pub fn required_length(windows: &[usize], volume_window: usize) -> usize {
    match windows.iter().copied().max() {
        Some(longest) => (longest + 2).max(volume_window),
        None => volume_window.max(1),
    }
}

/// Check `series` has at least `required` observations.
pub fn validate(series: &PriceSeries, required: usize) -> Result<(), ValidationError> {
    if series.is_empty() {
        return Err(ValidationError::Empty);
    }
    if series.len() < required {
        return Err(ValidationError::TooShort {
            len: series.len(),
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, Ticker};
    use chrono::NaiveDate;

    fn series_of(n: usize) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let obs = (0..n)
            .map(|i| Observation::new(base + chrono::Duration::days(i as i64), 100.0, 10))
            .collect();
        PriceSeries::new(Ticker::new("T").unwrap(), obs).unwrap()
    }

    #[test]
    fn required_length_for_default_windows() {
        assert_eq!(required_length(&[5, 10], 5), 12);
        assert_eq!(required_length(&[5], 5), 7);
        assert_eq!(required_length(&[1], 20), 20);
    }

    #[test]
    fn required_length_without_windows() {
        assert_eq!(required_length(&[], 0), 1);
        assert_eq!(required_length(&[], 7), 7);
    }

    #[test]
    fn empty_series_invalid() {
        assert_eq!(validate(&series_of(0), 12), Err(ValidationError::Empty));
    }

    #[test]
    fn short_series_invalid() {
        assert_eq!(
            validate(&series_of(8), 12),
            Err(ValidationError::TooShort {
                len: 8,
                required: 12
            })
        );
    }

    #[test]
    fn exact_length_valid() {
        assert!(validate(&series_of(12), 12).is_ok());
        assert!(validate(&series_of(30), 12).is_ok());
    }
}
