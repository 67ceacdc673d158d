//! Enrichment — optional direction labels appended to a ranked table.
//!
//! The bundled model is a toy: a logistic regression fitted on the very rows
//! it then labels. There is no held-out data, so its "predictions" say how
//! well a line separates today's up and down movers, not what happens next.
//! Enrichment never reorders rows or changes any number in the table.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::ranker::RankedTable;
use trendscan_core::domain::TrendRecord;
use trendscan_core::rng::RngHierarchy;

/// Predicted (or observed) direction of the last session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionLabel {
    Up,
    Down,
}

impl DirectionLabel {
    /// Observed label of a record: up when the last session closed higher.
    pub fn of(record: &TrendRecord) -> Self {
        if record.day_change_pct() > 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

impl fmt::Display for DirectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    #[error("need at least 2 rows to fit a classifier, got {rows}")]
    TooFewRows { rows: usize },

    #[error("all rows share the label '{label}'; nothing to separate")]
    SingleClass { label: DirectionLabel },

    #[error("classifier returned {got} labels for {expected} rows")]
    LengthMismatch { expected: usize, got: usize },
}

/// Pluggable table annotator.
pub trait Enricher {
    fn name(&self) -> &str;

    /// One label per table row, in row order.
    fn enrich(&self, table: &RankedTable) -> Result<Vec<DirectionLabel>, EnrichmentError>;
}

/// Run `enricher` and attach its labels to `table`.
///
/// On failure the unmodified table comes back alongside the error, so the
/// caller can still present the ranking.
pub fn apply(
    enricher: &dyn Enricher,
    table: RankedTable,
) -> Result<RankedTable, (RankedTable, EnrichmentError)> {
    match enricher.enrich(&table) {
        Ok(labels) => {
            let fallback = table.clone();
            table.with_predictions(labels).map_err(|e| (fallback, e))
        }
        Err(e) => Err((table, e)),
    }
}

/// Feature vector of a record: every trend percentage, then average volume.
pub fn features(record: &TrendRecord) -> Vec<f64> {
    let mut x: Vec<f64> = record.trends().iter().map(|t| t.pct).collect();
    x.push(record.avg_volume());
    x
}

/// Logistic regression fitted by seeded stochastic gradient descent.
#[derive(Debug, Clone)]
pub struct LogisticDirectionModel {
    seed: u64,
    epochs: usize,
    learning_rate: f64,
    l2: f64,
}

/// Fitted standardization and weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub xmeans: Vec<f64>,
    pub xscales: Vec<f64>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl FittedModel {
    /// Features beyond the fitted width are ignored; missing ones count as
    /// the column mean.
    pub fn probability_up(&self, x: &[f64]) -> f64 {
        let z: f64 = self.bias
            + x.iter()
                .zip(&self.weights)
                .zip(self.xmeans.iter().zip(&self.xscales))
                .map(|((v, w), (mean, scale))| w * (v - mean) / scale)
                .sum::<f64>();
        sigmoid(z)
    }

    pub fn predict(&self, x: &[f64]) -> DirectionLabel {
        if self.probability_up(x) >= 0.5 {
            DirectionLabel::Up
        } else {
            DirectionLabel::Down
        }
    }
}

impl LogisticDirectionModel {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            epochs: 200,
            learning_rate: 0.1,
            l2: 1e-3,
        }
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Fit on the table rows. Needs two rows and both labels present.
    pub fn fit(&self, table: &RankedTable) -> Result<FittedModel, EnrichmentError> {
        let rows: Vec<Vec<f64>> = table.records().map(features).collect();
        let labels: Vec<DirectionLabel> = table.records().map(DirectionLabel::of).collect();

        if rows.len() < 2 {
            return Err(EnrichmentError::TooFewRows { rows: rows.len() });
        }
        if labels.iter().all(|l| *l == labels[0]) {
            return Err(EnrichmentError::SingleClass { label: labels[0] });
        }

        let n_vars = rows.iter().map(Vec::len).max().unwrap_or(0);
        let (xmeans, xscales) = standardize(&rows, n_vars);

        let standardized: Vec<Vec<f64>> = rows
            .iter()
            .map(|x| {
                (0..n_vars)
                    .map(|i| {
                        let v = x.get(i).copied().unwrap_or(xmeans[i]);
                        (v - xmeans[i]) / xscales[i]
                    })
                    .collect()
            })
            .collect();
        let targets: Vec<f64> = labels
            .iter()
            .map(|l| if *l == DirectionLabel::Up { 1.0 } else { 0.0 })
            .collect();

        let key: Vec<&str> = table.tickers().iter().map(|t| t.as_str()).collect();
        let mut rng = RngHierarchy::new(self.seed).rng_for("classifier", &key.join(","));

        let mut weights = vec![0.0; n_vars];
        let mut bias = 0.0;
        let mut order: Vec<usize> = (0..standardized.len()).collect();

        for _ in 0..self.epochs {
            order.shuffle(&mut rng);
            for &i in &order {
                let x = &standardized[i];
                let z = bias + x.iter().zip(&weights).map(|(a, w)| a * w).sum::<f64>();
                let err = sigmoid(z) - targets[i];
                for (w, a) in weights.iter_mut().zip(x) {
                    *w -= self.learning_rate * (err * a + self.l2 * *w);
                }
                bias -= self.learning_rate * err;
            }
        }

        debug!(rows = rows.len(), n_vars, ?weights, bias, "fitted direction model");

        Ok(FittedModel {
            xmeans,
            xscales,
            weights,
            bias,
        })
    }
}

impl Enricher for LogisticDirectionModel {
    fn name(&self) -> &str {
        "logistic_direction"
    }

    fn enrich(&self, table: &RankedTable) -> Result<Vec<DirectionLabel>, EnrichmentError> {
        let model = self.fit(table)?;
        Ok(table
            .records()
            .map(|r| model.predict(&features(r)))
            .collect())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Column means and population standard deviations; a constant column gets
/// scale 1 so it standardizes to zero.
fn standardize(rows: &[Vec<f64>], n_vars: usize) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len() as f64;
    let mut means = vec![0.0; n_vars];
    let mut scales = vec![1.0; n_vars];
    for i in 0..n_vars {
        let col: Vec<f64> = rows.iter().filter_map(|r| r.get(i).copied()).collect();
        let mean = col.iter().sum::<f64>() / n;
        let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        means[i] = mean;
        let sd = var.sqrt();
        if sd.is_finite() && sd > 1e-12 {
            scales[i] = sd;
        }
    }
    (means, scales)
}
