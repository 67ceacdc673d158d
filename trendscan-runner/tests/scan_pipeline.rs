use std::collections::HashMap;

use chrono::NaiveDate;
use trendscan_core::data::{DataError, DataProvider, DataSource, FetchResult, SyntheticProvider};
use trendscan_core::domain::{Observation, PriceSeries, Ticker};
use trendscan_core::trend::TrendError;
use trendscan_core::validate::ValidationError;
use trendscan_runner::{
    run_scan, ConfigError, DirectionLabel, EnrichmentError, ExclusionReason,
    LogisticDirectionModel, RunOptions, ScanConfig, ScanReport,
};

/// In-memory provider: each symbol maps to a close sequence, or fails.
#[derive(Default)]
struct MockProvider {
    closes: HashMap<String, Vec<f64>>,
}

impl MockProvider {
    fn with(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.closes.insert(symbol.to_string(), closes);
        self
    }
}

impl DataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch(
        &self,
        ticker: &Ticker,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let closes = self
            .closes
            .get(ticker.as_str())
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            })?;
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let observations = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Observation::new(
                    first + chrono::Duration::days(i as i64),
                    c,
                    100 * (i as u64 + 1),
                )
            })
            .collect();
        Ok(FetchResult {
            series: PriceSeries::new(ticker.clone(), observations).unwrap(),
            source: DataSource::Synthetic,
        })
    }
}

fn sample() -> Vec<f64> {
    let mut v: Vec<f64> = (100..=110).map(f64::from).collect();
    v.push(120.0);
    v
}

fn rising(start: f64) -> Vec<f64> {
    (0..12).map(|i| start + i as f64).collect()
}

fn falling(start: f64) -> Vec<f64> {
    (0..12).map(|i| start - i as f64).collect()
}

fn tickers(symbols: &[&str]) -> Vec<Ticker> {
    symbols.iter().map(|s| Ticker::new(s).unwrap()).collect()
}

fn opts() -> RunOptions {
    RunOptions {
        end: NaiveDate::from_ymd_opt(2024, 3, 29).unwrap(),
        keep_charts: false,
    }
}

fn scan(provider: &MockProvider, symbols: &[&str]) -> ScanReport {
    run_scan(&ScanConfig::default(), &tickers(symbols), provider, None, opts()).unwrap()
}

fn order(report: &ScanReport) -> Vec<String> {
    report
        .table
        .as_ref()
        .unwrap()
        .tickers()
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[test]
fn sample_series_produces_expected_row() {
    let provider = MockProvider::default().with("XYZ", sample());
    let report = scan(&provider, &["XYZ"]);
    let table = report.table.unwrap();
    let row = table.records().next().unwrap();
    assert_eq!(row.trend(5), Some(14.29));
    assert_eq!(row.trend(10), Some(20.0));
    assert_eq!(row.last_close(), 120.0);
    assert!(report.excluded.is_empty());
}

#[test]
fn short_history_is_excluded_without_calculation() {
    let provider = MockProvider::default()
        .with("SHORT", rising(10.0)[..8].to_vec())
        .with("OK", sample());
    let report = scan(&provider, &["SHORT", "OK"]);

    assert_eq!(order(&report), vec!["OK"]);
    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.excluded[0].ticker.as_str(), "SHORT");
    assert!(matches!(
        report.excluded[0].reason,
        ExclusionReason::Invalid(ValidationError::TooShort {
            len: 8,
            required: 12
        })
    ));
    assert_eq!(report.stats.requested, 2);
    assert_eq!(report.stats.fetched, 2);
    assert_eq!(report.stats.validated, 1);
    assert_eq!(report.stats.calculated, 1);
}

#[test]
fn fetch_failure_does_not_abort_batch() {
    let provider = MockProvider::default().with("A", rising(50.0));
    let report = scan(&provider, &["MISSING", "A"]);
    assert_eq!(order(&report), vec!["A"]);
    assert!(matches!(
        report.excluded[0].reason,
        ExclusionReason::DataUnavailable(DataError::SymbolNotFound { .. })
    ));
}

#[test]
fn zero_base_is_degenerate() {
    let mut closes = rising(10.0);
    closes[5] = 0.0;
    let provider = MockProvider::default().with("Z", closes);
    let report = scan(&provider, &["Z"]);
    assert!(report.table.is_none());
    assert!(matches!(
        report.excluded[0].reason,
        ExclusionReason::Degenerate(TrendError::ZeroBase { window: 5 })
    ));
}

#[test]
fn all_excluded_is_no_usable_data() {
    let provider = MockProvider::default().with("A", vec![1.0, 2.0]);
    let report = scan(&provider, &["A", "B"]);
    assert!(!report.has_usable_data());
    assert_eq!(report.excluded.len(), 2);
}

#[test]
fn equal_trends_keep_input_order() {
    let provider = MockProvider::default()
        .with("B", sample())
        .with("A", sample());
    let report = scan(&provider, &["B", "A"]);
    assert_eq!(order(&report), vec!["B", "A"]);
}

#[test]
fn ranked_descending_by_shortest_window() {
    let provider = MockProvider::default()
        .with("UP", rising(100.0))
        .with("DOWN", falling(100.0))
        .with("XYZ", sample());
    let report = scan(&provider, &["DOWN", "UP", "XYZ"]);
    assert_eq!(order(&report), vec!["XYZ", "UP", "DOWN"]);
}

#[test]
fn empty_ticker_list_is_config_error() {
    let provider = MockProvider::default();
    let err = run_scan(&ScanConfig::default(), &[], &provider, None, opts()).unwrap_err();
    assert!(matches!(err, ConfigError::NoTickers));
}

#[test]
fn repeated_scans_are_identical() {
    let provider = MockProvider::default()
        .with("A", rising(20.0))
        .with("B", sample())
        .with("C", falling(90.0));
    let first = scan(&provider, &["A", "B", "C"]);
    let second = scan(&provider, &["A", "B", "C"]);
    assert_eq!(
        first.table.unwrap().fingerprint(),
        second.table.unwrap().fingerprint()
    );
}

#[test]
fn enrichment_labels_both_classes() {
    let provider = MockProvider::default()
        .with("U1", rising(100.0))
        .with("U2", rising(50.0))
        .with("D1", falling(100.0))
        .with("D2", falling(200.0));
    let config = ScanConfig {
        enrich: true,
        ..Default::default()
    };
    let model = LogisticDirectionModel::new(config.seed);
    let report = run_scan(
        &config,
        &tickers(&["U1", "U2", "D1", "D2"]),
        &provider,
        Some(&model),
        opts(),
    )
    .unwrap();

    assert!(report.enrichment_skipped.is_none());
    let table = report.table.unwrap();
    assert!(table.has_predictions());
    for row in table.rows() {
        assert_eq!(row.predicted, Some(DirectionLabel::of(&row.record)));
    }
}

#[test]
fn single_class_skips_enrichment_but_keeps_table() {
    let provider = MockProvider::default()
        .with("U1", rising(100.0))
        .with("U2", rising(50.0));
    let config = ScanConfig {
        enrich: true,
        ..Default::default()
    };
    let model = LogisticDirectionModel::new(1);
    let report = run_scan(
        &config,
        &tickers(&["U1", "U2"]),
        &provider,
        Some(&model),
        opts(),
    )
    .unwrap();

    assert!(matches!(
        report.enrichment_skipped,
        Some(EnrichmentError::SingleClass {
            label: DirectionLabel::Up
        })
    ));
    let table = report.table.unwrap();
    assert_eq!(table.len(), 2);
    assert!(!table.has_predictions());
}

#[test]
fn enricher_ignored_when_disabled() {
    let provider = MockProvider::default()
        .with("U", rising(100.0))
        .with("D", falling(100.0));
    let model = LogisticDirectionModel::new(1);
    let report = run_scan(
        &ScanConfig::default(),
        &tickers(&["U", "D"]),
        &provider,
        Some(&model),
        opts(),
    )
    .unwrap();
    assert!(!report.table.unwrap().has_predictions());
    assert!(report.enrichment_skipped.is_none());
}

#[test]
fn synthetic_scan_end_to_end() {
    let provider = SyntheticProvider::new(42);
    let symbols = ["AAPL", "MSFT", "NVDA"];
    let run = || {
        run_scan(
            &ScanConfig::default(),
            &tickers(&symbols),
            &provider,
            None,
            RunOptions {
                keep_charts: true,
                ..opts()
            },
        )
        .unwrap()
    };
    let report = run();
    let table = report.table.as_ref().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(report.charts.len(), 3);
    assert!(report
        .sources
        .iter()
        .all(|(_, s)| *s == DataSource::Synthetic));

    let trends: Vec<f64> = table.records().map(|r| r.trend(5).unwrap()).collect();
    assert!(trends.windows(2).all(|w| w[0] >= w[1]));

    assert_eq!(table.fingerprint(), run().table.unwrap().fingerprint());
}
