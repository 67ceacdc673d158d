//! Reporting and export — CSV, JSON and Markdown renderings of a ranked table.
//!
//! All three formats carry the same columns: rank, ticker, last close, one
//! trend column per window, average volume, prior mean close, last-day
//! change, and the predicted direction when the table was enriched.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::ranker::RankedTable;

/// Version of the JSON export layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Flat row used by the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub rank: usize,
    pub ticker: String,
    pub last_close: f64,
    pub trends: Vec<(usize, f64)>,
    pub avg_volume: f64,
    pub prior_mean_close: Option<f64>,
    pub day_change_pct: f64,
    pub predicted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableExport {
    pub schema_version: u32,
    pub rank_window: usize,
    pub fingerprint: String,
    pub rows: Vec<ExportRow>,
}

impl TableExport {
    pub fn from_table(table: &RankedTable) -> Self {
        let rows = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let r = &row.record;
                ExportRow {
                    rank: i + 1,
                    ticker: r.ticker().to_string(),
                    last_close: r.last_close(),
                    trends: r.trends().iter().map(|t| (t.window, t.pct)).collect(),
                    avg_volume: r.avg_volume(),
                    prior_mean_close: r.prior_mean_close(),
                    day_change_pct: r.day_change_pct(),
                    predicted: row.predicted.map(|p| p.to_string()),
                }
            })
            .collect();
        Self {
            schema_version: SCHEMA_VERSION,
            rank_window: table.rank_window(),
            fingerprint: table.fingerprint(),
            rows,
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(table: &RankedTable) -> Result<String> {
    serde_json::to_string_pretty(&TableExport::from_table(table))
        .context("failed to serialize ranked table to JSON")
}

/// Parse a JSON export, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<TableExport> {
    let export: TableExport =
        serde_json::from_str(json).context("failed to deserialize ranked table JSON")?;
    if export.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            export.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(export)
}

// ─── CSV ────────────────────────────────────────────────────────────

fn header(table: &RankedTable) -> Vec<String> {
    let mut cols: Vec<String> = vec!["rank".into(), "ticker".into(), "last_close".into()];
    cols.extend(table.windows().iter().map(|w| format!("trend_{w}_pct")));
    cols.push("avg_volume".into());
    cols.push("prior_mean_close".into());
    cols.push("day_change_pct".into());
    if table.has_predictions() {
        cols.push("predicted".into());
    }
    cols
}

fn cells(table: &RankedTable) -> Vec<Vec<String>> {
    let windows = table.windows();
    let with_pred = table.has_predictions();
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let r = &row.record;
            let mut out = vec![
                (i + 1).to_string(),
                r.ticker().to_string(),
                format!("{:.2}", r.last_close()),
            ];
            out.extend(windows.iter().map(|w| {
                r.trend(*w)
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_default()
            }));
            out.push(format!("{:.0}", r.avg_volume()));
            out.push(
                r.prior_mean_close()
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_default(),
            );
            out.push(format!("{:.2}", r.day_change_pct()));
            if with_pred {
                out.push(row.predicted.map(|p| p.to_string()).unwrap_or_default());
            }
            out
        })
        .collect()
}

pub fn export_csv(table: &RankedTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header(table))?;
    for row in cells(table) {
        wtr.write_record(&row)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

pub fn export_markdown(table: &RankedTable) -> String {
    let head = header(table);
    let mut md = String::new();
    md.push_str(&format!(
        "## Trend ranking (by {}-day trend)\n\n",
        table.rank_window()
    ));
    md.push_str(&format!("| {} |\n", head.join(" | ")));
    md.push_str(&format!(
        "|{}|\n",
        head.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    ));
    for row in cells(table) {
        md.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    if table.has_predictions() {
        md.push_str(
            "\n_Predicted direction comes from a classifier fitted on these same rows; \
             it has no demonstrated forecasting power._\n",
        );
    }
    md
}

// ─── Files ──────────────────────────────────────────────────────────

pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
