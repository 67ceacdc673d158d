//! TrendScan CLI — scan tickers and print the ranked trend table.
//!
//! Commands:
//! - `scan` — fetch recent history, compute trends, rank, optionally enrich
//! - `universe list` — show the named ticker lists
//! - `universe show <NAME>` — show the tickers in one list

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use trendscan_core::chart::ChartSeries;
use trendscan_core::data::{DataProvider, FileProvider, SyntheticProvider, Universe, YahooProvider};
use trendscan_runner::export::write_export;
use trendscan_runner::{
    export_csv, export_json, export_markdown, run_scan, LogisticDirectionModel, ProviderKind,
    RankBy, RankedTable, RunOptions, ScanConfig, ScanReport, TickerSource,
};

#[derive(Parser)]
#[command(
    name = "trendscan",
    about = "TrendScan CLI — rank tickers by short-term price trend"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Yahoo,
    File,
    Synthetic,
}

impl From<SourceArg> for ProviderKind {
    fn from(s: SourceArg) -> Self {
        match s {
            SourceArg::Yahoo => ProviderKind::Yahoo,
            SourceArg::File => ProviderKind::File,
            SourceArg::Synthetic => ProviderKind::Synthetic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch recent history, compute trends and print the ranked table.
    Scan(ScanArgs),
    /// Named ticker lists.
    Universe {
        #[command(subcommand)]
        action: UniverseAction,

        /// Universe TOML file. Defaults to the built-in lists.
        #[arg(long)]
        universe_file: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ScanArgs {
    /// Comma-separated tickers, e.g. "aapl, msft, nvda".
    #[arg(long, conflicts_with = "universe")]
    tickers: Option<String>,

    /// Named ticker list (see `trendscan universe list`).
    #[arg(long)]
    universe: Option<String>,

    /// Universe TOML file. Defaults to the built-in lists.
    #[arg(long)]
    universe_file: Option<PathBuf>,

    /// Scan config TOML. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lookback windows in sessions, comma-separated.
    #[arg(long, value_delimiter = ',')]
    windows: Option<Vec<usize>>,

    /// Sessions averaged for volume.
    #[arg(long)]
    volume_window: Option<usize>,

    /// Window to rank by: a window length, "shortest" or "longest".
    #[arg(long)]
    rank_by: Option<String>,

    /// Market data source.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Directory of <TICKER>.csv / <TICKER>.parquet files (with --source file).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Calendar days of history to request.
    #[arg(long)]
    days: Option<u32>,

    /// Last day of history (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<String>,

    /// Append a predicted up/down direction per row.
    #[arg(long, default_value_t = false)]
    enrich: bool,

    /// Seed for the classifier and the synthetic source.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the table as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the table as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the table as Markdown.
    #[arg(long)]
    markdown: Option<PathBuf>,

    /// Print the close and moving averages for each ranked ticker.
    #[arg(long, default_value_t = false)]
    charts: bool,
}

#[derive(Subcommand)]
enum UniverseAction {
    /// List the named ticker lists.
    List,
    /// Show the tickers in one list.
    Show {
        /// List name.
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scan(args) => run_scan_cmd(args),
        Commands::Universe {
            action,
            universe_file,
        } => {
            let universe = load_universe(universe_file.as_deref())?;
            match action {
                UniverseAction::List => run_universe_list(&universe),
                UniverseAction::Show { name } => run_universe_show(&universe, &name),
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn load_universe(path: Option<&Path>) -> Result<Universe> {
    match path {
        Some(p) => Universe::from_file(p)
            .with_context(|| format!("failed to load universe {}", p.display())),
        None => Ok(Universe::builtin()),
    }
}

fn parse_rank_by(s: &str) -> Result<RankBy> {
    match s.trim().to_ascii_lowercase().as_str() {
        "shortest" => Ok(RankBy::Shortest),
        "longest" => Ok(RankBy::Longest),
        other => match other.parse::<usize>() {
            Ok(w) => Ok(RankBy::Window(w)),
            Err(_) => bail!("invalid --rank-by '{s}'. Valid: a window length, shortest, longest"),
        },
    }
}

/// Config file values, then flag overrides.
fn build_config(args: &ScanArgs) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::default(),
    };

    if let Some(text) = &args.tickers {
        config.ticker_source = TickerSource::FreeText { text: text.clone() };
    } else if let Some(name) = &args.universe {
        config.ticker_source = TickerSource::FixedList { name: name.clone() };
    }
    if let Some(windows) = &args.windows {
        config.lookback_windows = windows.clone();
    }
    if let Some(v) = args.volume_window {
        config.volume_window = v;
    }
    if let Some(r) = &args.rank_by {
        config.rank_by = parse_rank_by(r)?;
    }
    if let Some(source) = args.source {
        config.provider = source.into();
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(days) = args.days {
        config.history_days = days;
    }
    if args.enrich {
        config.enrich = true;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn build_provider(config: &ScanConfig) -> Result<Box<dyn DataProvider>> {
    Ok(match config.provider {
        ProviderKind::Yahoo => Box::new(YahooProvider::new()?),
        ProviderKind::File => {
            let dir = config
                .data_dir
                .clone()
                .context("--source file needs --data-dir")?;
            Box::new(FileProvider::new(dir))
        }
        ProviderKind::Synthetic => Box::new(SyntheticProvider::new(config.seed)),
    })
}

fn run_scan_cmd(args: ScanArgs) -> Result<()> {
    let config = build_config(&args)?;
    let universe = load_universe(args.universe_file.as_deref())?;
    let tickers = config.resolve_tickers(&universe)?;
    debug!(?config, tickers = tickers.len(), "resolved scan config");

    let end = args
        .end
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--end must be YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let provider = build_provider(&config)?;
    let model = LogisticDirectionModel::new(config.seed);
    let report = run_scan(
        &config,
        &tickers,
        provider.as_ref(),
        Some(&model),
        RunOptions {
            end,
            keep_charts: args.charts,
        },
    )?;

    print_report(&report);

    if let Some(table) = &report.table {
        if let Some(path) = &args.csv {
            write_export(path, &export_csv(table)?)?;
            println!("CSV written to: {}", path.display());
        }
        if let Some(path) = &args.json {
            write_export(path, &export_json(table)?)?;
            println!("JSON written to: {}", path.display());
        }
        if let Some(path) = &args.markdown {
            write_export(path, &export_markdown(table))?;
            println!("Markdown written to: {}", path.display());
        }
        if args.charts {
            for chart in &report.charts {
                print_chart(chart);
            }
        }
    }

    Ok(())
}

fn print_report(report: &ScanReport) {
    println!();
    println!("=== Trend Scan: {} to {} ===", report.start, report.end);

    match &report.table {
        None => {
            println!();
            println!(
                "No usable data: none of the {} tickers had enough history.",
                report.stats.requested
            );
        }
        Some(table) => print_table(table),
    }

    if let Some(reason) = &report.enrichment_skipped {
        println!();
        println!("Prediction unavailable: {reason}");
    }

    if !report.excluded.is_empty() {
        println!();
        println!("Excluded ({}):", report.excluded.len());
        for exclusion in &report.excluded {
            println!("  {:<8} {}", exclusion.ticker, exclusion.reason);
        }
    }
    println!();
}

fn print_table(table: &RankedTable) {
    let windows = table.windows();
    let with_pred = table.has_predictions();

    println!("Ranked by {}-day trend", table.rank_window());
    println!();

    let mut header = format!("{:>4}  {:<8} {:>10}", "#", "Ticker", "Close");
    for w in &windows {
        header.push_str(&format!(" {:>10}", format!("{w}d %")));
    }
    header.push_str(&format!(" {:>14} {:>10}", "Avg Volume", "Day %"));
    if with_pred {
        header.push_str(&format!(" {:>9}", "Predicted"));
    }
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    for (i, row) in table.rows().iter().enumerate() {
        let r = &row.record;
        let mut line = format!("{:>4}  {:<8} {:>10.2}", i + 1, r.ticker(), r.last_close());
        for w in &windows {
            match r.trend(*w) {
                Some(v) => line.push_str(&format!(" {v:>10.2}")),
                None => line.push_str(&format!(" {:>10}", "-")),
            }
        }
        line.push_str(&format!(
            " {:>14.0} {:>10.2}",
            r.avg_volume(),
            r.day_change_pct()
        ));
        if let Some(p) = row.predicted {
            line.push_str(&format!(" {:>9}", p.to_string()));
        }
        println!("{line}");
    }

    if with_pred {
        println!();
        println!(
            "Note: predictions come from a classifier fitted on these same rows. \
             They are not a forecast."
        );
    }
}

/// Last few rows of close and moving averages.
fn print_chart(chart: &ChartSeries) {
    const ROWS: usize = 10;
    println!();
    println!("--- {} ---", chart.ticker);
    let mut header = format!("{:<12} {:>10}", "Date", "Close");
    for line in &chart.overlays {
        header.push_str(&format!(" {:>10}", line.name));
    }
    println!("{header}");

    let start = chart.len().saturating_sub(ROWS);
    for i in start..chart.len() {
        let mut row = format!("{:<12} {:>10.2}", chart.dates[i], chart.close[i]);
        for line in &chart.overlays {
            match line.values.get(i).copied().flatten() {
                Some(v) => row.push_str(&format!(" {v:>10.2}")),
                None => row.push_str(&format!(" {:>10}", "-")),
            }
        }
        println!("{row}");
    }
}

fn run_universe_list(universe: &Universe) -> Result<()> {
    for name in universe.list_names() {
        let count = universe.list(name).map_or(0, |l| l.len());
        println!("  {name:<12} {count} tickers");
    }
    Ok(())
}

fn run_universe_show(universe: &Universe, name: &str) -> Result<()> {
    let Some(list) = universe.list(name) else {
        bail!(
            "unknown list '{name}'. Available: {}",
            universe.list_names().join(", ")
        );
    };
    let symbols: Vec<&str> = list.iter().map(|t| t.as_str()).collect();
    println!("{name}: {}", symbols.join(", "));
    Ok(())
}
