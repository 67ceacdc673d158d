//! Ranker — orders trend records by trend strength, strongest first.
//!
//! The sort is stable: records with equal trend values keep their input
//! order. Records missing the ranking window (or holding NaN there) sink to
//! the bottom, also in input order. An empty input is not an error; it comes
//! back as [`RankOutcome::NoUsableData`] so the caller can warn the user.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::enrichment::{DirectionLabel, EnrichmentError};
use trendscan_core::domain::{Ticker, TrendRecord};

/// Which trend window drives the ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// The shortest lookback window present in the records.
    #[default]
    Shortest,
    /// The longest lookback window present in the records.
    Longest,
    /// A specific window.
    Window(usize),
}

impl RankBy {
    /// Resolve to a concrete window given the available windows.
    pub fn resolve(&self, windows: &[usize]) -> Option<usize> {
        match self {
            Self::Shortest => windows.iter().copied().min(),
            Self::Longest => windows.iter().copied().max(),
            Self::Window(w) => windows.contains(w).then_some(*w),
        }
    }
}

/// A ranked record plus the optional enrichment label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub record: TrendRecord,
    pub predicted: Option<DirectionLabel>,
}

/// Records sorted by one trend window, descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTable {
    rank_window: usize,
    rows: Vec<RankedRow>,
}

/// Outcome of ranking.
#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    Ranked(RankedTable),
    /// Nothing survived exclusion.
    NoUsableData,
}

impl RankOutcome {
    pub fn into_table(self) -> Option<RankedTable> {
        match self {
            Self::Ranked(t) => Some(t),
            Self::NoUsableData => None,
        }
    }
}

/// Rank `records` by the window `by` resolves to.
pub fn rank(records: Vec<TrendRecord>, by: RankBy) -> RankOutcome {
    if records.is_empty() {
        return RankOutcome::NoUsableData;
    }

    let mut windows: Vec<usize> = records
        .iter()
        .flat_map(|r| r.trends().iter().map(|t| t.window))
        .collect();
    windows.sort_unstable();
    windows.dedup();

    // A requested window nobody has still yields a table, in input order.
    let rank_window = match by {
        RankBy::Window(w) => w,
        _ => by.resolve(&windows).unwrap_or(0),
    };

    let mut rows: Vec<RankedRow> = records
        .into_iter()
        .map(|record| RankedRow {
            record,
            predicted: None,
        })
        .collect();

    // slice::sort_by is stable
    rows.sort_by(|a, b| {
        descending(
            a.record.trend(rank_window),
            b.record.trend(rank_window),
        )
    });

    RankOutcome::Ranked(RankedTable { rank_window, rows })
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.filter(|v| !v.is_nan());
    let b = b.filter(|v| !v.is_nan());
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl RankedTable {
    pub fn rank_window(&self) -> usize {
        self.rank_window
    }

    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &TrendRecord> {
        self.rows.iter().map(|r| &r.record)
    }

    pub fn tickers(&self) -> Vec<&Ticker> {
        self.rows.iter().map(|r| r.record.ticker()).collect()
    }

    /// All trend windows present, ascending.
    pub fn windows(&self) -> Vec<usize> {
        let mut w: Vec<usize> = self
            .records()
            .flat_map(|r| r.trends().iter().map(|t| t.window))
            .collect();
        w.sort_unstable();
        w.dedup();
        w
    }

    pub fn has_predictions(&self) -> bool {
        self.rows.iter().any(|r| r.predicted.is_some())
    }

    /// Attach one label per row, in row order. Order and numbers are untouched.
    pub fn with_predictions(mut self, labels: Vec<DirectionLabel>) -> Result<Self, EnrichmentError> {
        if labels.len() != self.rows.len() {
            return Err(EnrichmentError::LengthMismatch {
                expected: self.rows.len(),
                got: labels.len(),
            });
        }
        for (row, label) in self.rows.iter_mut().zip(labels) {
            row.predicted = Some(label);
        }
        Ok(self)
    }

    /// BLAKE3 over every row, in order. Two runs over the same data produce
    /// the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.rank_window as u64).to_le_bytes());
        for row in &self.rows {
            let r = &row.record;
            hasher.update(r.ticker().as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(&r.last_close().to_le_bytes());
            for t in r.trends() {
                hasher.update(&(t.window as u64).to_le_bytes());
                hasher.update(&t.pct.to_le_bytes());
            }
            hasher.update(&r.avg_volume().to_le_bytes());
            let label = match row.predicted {
                None => 0u8,
                Some(DirectionLabel::Down) => 1,
                Some(DirectionLabel::Up) => 2,
            };
            hasher.update(&[label]);
        }
        hasher.finalize().to_hex().to_string()
    }
}
