//! Synthetic provider — deterministic random-walk series for offline use.
//!
//! Every ticker gets its own walk derived from the master seed, so scans
//! against synthetic data are reproducible. Results are obviously fake and
//! reported as `DataSource::Synthetic`.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{Observation, PriceSeries, Ticker};
use crate::rng::RngHierarchy;

#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider {
    seeds: RngHierarchy,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seeds: RngHierarchy::new(seed),
        }
    }

    /// Random walk over weekdays in `[start, end]`, starting near 100.
    pub fn generate(&self, ticker: &Ticker, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        let mut rng = self.seeds.rng_for("synthetic", ticker.as_str());

        let mut observations = Vec::new();
        let mut price = rng.gen_range(50.0..150.0_f64);
        let mut current = start;

        while current <= end {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                let daily_return: f64 = rng.gen_range(-0.03..0.03);
                price *= 1.0 + daily_return;
                let volume = rng.gen_range(500_000..5_000_000u64);
                observations.push(Observation::new(current, price, volume));
            }
            current += chrono::Duration::days(1);
        }

        PriceSeries::from_unsorted(ticker.clone(), observations)
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            series: self.generate(ticker, start, end),
            source: DataSource::Synthetic,
        })
    }
}
