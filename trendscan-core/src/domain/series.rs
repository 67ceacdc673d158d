//! PriceSeries — the daily close/volume history for one ticker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ticker::Ticker;

/// One daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

impl Observation {
    pub fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self { date, close, volume }
    }

    /// A usable observation has a finite, positive close.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("observations out of order at index {index}: {prev} then {next}")]
    OutOfOrder {
        index: usize,
        prev: NaiveDate,
        next: NaiveDate,
    },

    #[error("duplicate date {date} at index {index}")]
    DuplicateDate { index: usize, date: NaiveDate },
}

/// Ordered daily observations for one ticker, oldest first.
///
/// Dates are strictly increasing. The only way to build a series is through
/// [`PriceSeries::new`] (which checks) or [`PriceSeries::from_unsorted`]
/// (which repairs), so every series in circulation holds the invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: Ticker,
    observations: Vec<Observation>,
}

impl PriceSeries {
    pub fn new(ticker: Ticker, observations: Vec<Observation>) -> Result<Self, SeriesError> {
        for (i, w) in observations.windows(2).enumerate() {
            if w[1].date == w[0].date {
                return Err(SeriesError::DuplicateDate {
                    index: i + 1,
                    date: w[1].date,
                });
            }
            if w[1].date < w[0].date {
                return Err(SeriesError::OutOfOrder {
                    index: i + 1,
                    prev: w[0].date,
                    next: w[1].date,
                });
            }
        }
        Ok(Self {
            ticker,
            observations,
        })
    }

    /// Sort by date and collapse duplicate dates, keeping the later row.
    ///
    /// Providers occasionally emit an intraday row for "today" next to the
    /// settled daily row; the later one wins.
    pub fn from_unsorted(ticker: Ticker, mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);
        let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }
        Self {
            ticker,
            observations: deduped,
        }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Observation `offset` rows back from the newest: `from_end(0)` is the
    /// last row, `from_end(1)` the one before it.
    pub fn from_end(&self, offset: usize) -> Option<&Observation> {
        let n = self.observations.len();
        if offset >= n {
            return None;
        }
        self.observations.get(n - 1 - offset)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    /// The newest `n` observations (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }
}
