//! Scan pipeline — fetch, validate, calculate, rank, optionally enrich.
//!
//! Tickers are processed one at a time in input order. Any per-ticker
//! failure (fetch error, short history, zero base) turns into an
//! [`Exclusion`] and the batch moves on; only an empty result is reported
//! to the user, as "no usable data".

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ScanConfig};
use crate::enrichment::{self, Enricher, EnrichmentError};
use crate::ranker::{rank, RankOutcome, RankedTable};
use trendscan_core::chart::ChartSeries;
use trendscan_core::data::{DataError, DataProvider, DataSource};
use trendscan_core::domain::{Ticker, TrendRecord};
use trendscan_core::trend::{TrendCalculator, TrendError};
use trendscan_core::validate::{validate, ValidationError};

/// Why a ticker did not make it into the table.
#[derive(Debug, Error)]
pub enum ExclusionReason {
    #[error("data unavailable: {0}")]
    DataUnavailable(#[from] DataError),

    #[error("insufficient history: {0}")]
    Invalid(#[from] ValidationError),

    #[error("degenerate input: {0}")]
    Degenerate(TrendError),
}

impl From<TrendError> for ExclusionReason {
    fn from(e: TrendError) -> Self {
        match e {
            TrendError::Invalid(v) => Self::Invalid(v),
            other => Self::Degenerate(other),
        }
    }
}

#[derive(Debug)]
pub struct Exclusion {
    pub ticker: Ticker,
    pub reason: ExclusionReason,
}

/// Result of analyzing a single ticker.
#[derive(Debug)]
pub enum TickerOutcome {
    Included {
        record: TrendRecord,
        source: DataSource,
        chart: Option<ChartSeries>,
    },
    Excluded(Exclusion),
}

/// Counts through each stage of a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub requested: usize,
    pub fetched: usize,
    pub validated: usize,
    pub calculated: usize,
}

/// Everything a presentation layer needs from one scan.
#[derive(Debug)]
pub struct ScanReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `None` when nothing survived exclusion.
    pub table: Option<RankedTable>,
    pub excluded: Vec<Exclusion>,
    pub sources: Vec<(Ticker, DataSource)>,
    pub charts: Vec<ChartSeries>,
    pub enrichment_skipped: Option<EnrichmentError>,
    pub stats: ScanStats,
}

impl ScanReport {
    pub fn has_usable_data(&self) -> bool {
        self.table.is_some()
    }
}

/// Per-run options that are not part of the persisted config.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Last day of history to request (inclusive).
    pub end: NaiveDate,
    /// Keep close/SMA chart series for included tickers.
    pub keep_charts: bool,
}

/// Fetch, validate and calculate one ticker.
pub fn analyze_ticker(
    provider: &dyn DataProvider,
    calculator: &TrendCalculator,
    ticker: &Ticker,
    start: NaiveDate,
    end: NaiveDate,
    keep_chart: bool,
    stats: &mut ScanStats,
) -> TickerOutcome {
    let excluded = |reason: ExclusionReason| {
        TickerOutcome::Excluded(Exclusion {
            ticker: ticker.clone(),
            reason,
        })
    };

    debug!(ticker = %ticker, provider = provider.name(), "fetching");
    let fetched = match provider.fetch(ticker, start, end) {
        Ok(f) => f,
        Err(e) => return excluded(e.into()),
    };
    stats.fetched += 1;

    if let Err(e) = validate(&fetched.series, calculator.required_length()) {
        return excluded(e.into());
    }
    stats.validated += 1;

    let chart = keep_chart.then(|| ChartSeries::from_series(&fetched.series));

    match calculator.compute(&fetched.series) {
        Ok(record) => {
            stats.calculated += 1;
            TickerOutcome::Included {
                record,
                source: fetched.source,
                chart,
            }
        }
        Err(e) => excluded(e.into()),
    }
}

/// Run a full scan over `tickers`.
///
/// Only configuration problems fail the call; everything per-ticker ends up
/// in the report.
pub fn run_scan(
    config: &ScanConfig,
    tickers: &[Ticker],
    provider: &dyn DataProvider,
    enricher: Option<&dyn Enricher>,
    opts: RunOptions,
) -> Result<ScanReport, ConfigError> {
    let calculator = config.validate()?;
    if tickers.is_empty() {
        return Err(ConfigError::NoTickers);
    }

    let end = opts.end;
    let start = end - chrono::Duration::days(i64::from(config.history_days));
    info!(
        tickers = tickers.len(),
        %start,
        %end,
        provider = provider.name(),
        windows = ?calculator.windows(),
        "starting scan"
    );

    let mut stats = ScanStats {
        requested: tickers.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(tickers.len());
    let mut excluded = Vec::new();
    let mut sources = Vec::new();
    let mut charts = Vec::new();

    for ticker in tickers {
        match analyze_ticker(
            provider,
            &calculator,
            ticker,
            start,
            end,
            opts.keep_charts,
            &mut stats,
        ) {
            TickerOutcome::Included {
                record,
                source,
                chart,
            } => {
                sources.push((ticker.clone(), source));
                charts.extend(chart);
                records.push(record);
            }
            TickerOutcome::Excluded(exclusion) => {
                debug!(ticker = %exclusion.ticker, reason = %exclusion.reason, "excluded");
                excluded.push(exclusion);
            }
        }
    }

    let mut enrichment_skipped = None;
    let table = match rank(records, config.rank_by) {
        RankOutcome::NoUsableData => {
            warn!(requested = tickers.len(), "no usable data for any ticker");
            None
        }
        RankOutcome::Ranked(table) => match enricher.filter(|_| config.enrich) {
            None => Some(table),
            Some(enricher) => match enrichment::apply(enricher, table) {
                Ok(enriched) => Some(enriched),
                Err((table, e)) => {
                    warn!(enricher = enricher.name(), error = %e, "enrichment skipped");
                    enrichment_skipped = Some(e);
                    Some(table)
                }
            },
        },
    };

    info!(
        ranked = table.as_ref().map_or(0, RankedTable::len),
        excluded = excluded.len(),
        "scan complete"
    );

    Ok(ScanReport {
        start,
        end,
        table,
        excluded,
        sources,
        charts,
        enrichment_skipped,
        stats,
    })
}
