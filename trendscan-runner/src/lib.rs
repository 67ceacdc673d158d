//! TrendScan Runner — scan orchestration on top of `trendscan-core`.
//!
//! This crate provides:
//! - Scan configuration (TOML, serde defaults)
//! - The fetch → validate → calculate → rank pipeline with per-ticker exclusion
//! - Stable descending ranking and table fingerprints
//! - Optional direction enrichment (seeded logistic regression)
//! - CSV / JSON / Markdown export

pub mod config;
pub mod enrichment;
pub mod export;
pub mod pipeline;
pub mod ranker;

pub use config::{ConfigError, ProviderKind, ScanConfig, TickerSource, DEFAULT_HISTORY_DAYS};
pub use enrichment::{
    DirectionLabel, Enricher, EnrichmentError, FittedModel, LogisticDirectionModel,
};
pub use export::{export_csv, export_json, export_markdown, import_json, TableExport};
pub use pipeline::{
    analyze_ticker, run_scan, Exclusion, ExclusionReason, RunOptions, ScanReport, ScanStats,
    TickerOutcome,
};
pub use ranker::{rank, RankBy, RankOutcome, RankedRow, RankedTable};
