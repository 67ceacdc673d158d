//! Chart series — close price with its moving averages, per ticker.
//!
//! The presentation layer plots these next to the ranked table. Rows inside
//! an average's warmup carry no value.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{PriceSeries, Ticker};
use crate::indicators::{Indicator, Sma};

/// Moving-average periods drawn on every chart.
pub const CHART_SMA_PERIODS: [usize; 2] = [5, 10];

/// One named line on a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLine {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub ticker: Ticker,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub overlays: Vec<ChartLine>,
}

impl ChartSeries {
    /// Close plus 5- and 10-period SMAs.
    pub fn from_series(series: &PriceSeries) -> Self {
        let indicators: Vec<Box<dyn Indicator>> = CHART_SMA_PERIODS
            .iter()
            .map(|&p| Box::new(Sma::new(p)) as Box<dyn Indicator>)
            .collect();
        Self::with_indicators(series, &indicators)
    }

    pub fn with_indicators(series: &PriceSeries, indicators: &[Box<dyn Indicator>]) -> Self {
        let close = series.closes();
        let overlays = indicators
            .iter()
            .map(|ind| ChartLine {
                name: ind.name().to_string(),
                values: ind.compute(&close),
            })
            .collect();
        Self {
            ticker: series.ticker().clone(),
            dates: series.dates(),
            close,
            overlays,
        }
    }

    pub fn overlay(&self, name: &str) -> Option<&ChartLine> {
        self.overlays.iter().find(|l| l.name == name)
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}
