//! StockETL CLI: fetch, enrich, store and chart a daily price series.
//!
//! Commands:
//! - `run` (default): extract from Alpha Vantage (or synthetic data),
//!   transform, write `data/processed/{SYMBOL}_daily.csv`, then chart it
//! - `chart`: re-render the chart from an existing processed CSV

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use stocketl_core::extract::validate_symbol;
use stocketl_core::{
    run_from_config, CsvLoader, DuplicatePolicy, EnrichedSeries, PipelineConfig, SourceKind,
};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Rows printed after a successful run.
const PREVIEW_ROWS: usize = 5;

#[derive(Parser)]
#[command(
    name = "stocketl",
    version,
    about = "StockETL: daily stock price ETL with moving averages and volatility"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, transform and store a daily series, then chart it.
    Run(RunArgs),
    /// Chart an already processed series.
    Chart(ChartArgs),
}

#[derive(Args, Default)]
struct RunArgs {
    /// Ticker symbol. Defaults to the config value (AAPL).
    #[arg(long)]
    symbol: Option<String>,

    /// Path to a TOML config file. Defaults to ./stocketl.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use deterministic synthetic data instead of the API.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Skip the interactive terminal chart.
    #[arg(long, default_value_t = false)]
    no_display: bool,

    /// Directory for processed CSV output.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Chart image path.
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Duplicate-date handling: reject, keep-first, keep-last.
    #[arg(long)]
    duplicates: Option<DuplicatePolicy>,
}

#[derive(Args)]
struct ChartArgs {
    /// Ticker symbol whose processed CSV should be charted.
    #[arg(long)]
    symbol: Option<String>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding processed CSVs.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Chart image path.
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Skip the interactive terminal chart.
    #[arg(long, default_value_t = false)]
    no_display: bool,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run_cmd(args),
        Commands::Chart(args) => chart_cmd(args),
    }
}

/// Logs go to stderr; stdout carries the user-facing summary.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let mut config = PipelineConfig::load(args.config.as_deref())?;
    if let Some(symbol) = args.symbol {
        config.symbol = symbol;
    }
    if args.synthetic {
        config.source = SourceKind::Synthetic;
    }
    if let Some(dir) = args.output_dir {
        config.processed_dir = dir;
    }
    if let Some(chart) = args.chart {
        config.chart_path = chart;
    }
    if let Some(policy) = args.duplicates {
        config.duplicates = policy;
    }

    debug!(
        symbol = %config.symbol,
        source = ?config.source,
        processed_dir = %config.processed_dir.display(),
        "resolved run config"
    );
    let report = run_from_config(&config)
        .with_context(|| format!("pipeline failed for {}", config.symbol))?;

    println!("Saved data to {}", report.outcome.csv_path.display());
    if let Some(parquet) = &report.outcome.parquet_path {
        println!("Parquet copy: {}", parquet.display());
    }
    print_head(&report.series, PREVIEW_ROWS);

    chart(&report.series, &config.chart_path, args.no_display)
}

fn chart_cmd(args: ChartArgs) -> Result<()> {
    let mut config = PipelineConfig::load(args.config.as_deref())?;
    if let Some(symbol) = args.symbol {
        config.symbol = symbol;
    }
    if let Some(dir) = args.output_dir {
        config.processed_dir = dir;
    }
    if let Some(chart) = args.chart {
        config.chart_path = chart;
    }

    let series = read_processed(&config)?;
    chart(&series, &config.chart_path, args.no_display)
}

/// Load the processed CSV for `config.symbol` from `config.processed_dir`.
fn read_processed(config: &PipelineConfig) -> Result<EnrichedSeries> {
    validate_symbol(&config.symbol)?;
    let loader = CsvLoader::new(&config.processed_dir);
    loader.read(&config.symbol).with_context(|| {
        format!(
            "no processed data for {}; run `stocketl run --symbol {}` first",
            config.symbol, config.symbol
        )
    })
}

/// Write the chart file, then show the interactive view unless disabled.
fn chart(series: &EnrichedSeries, path: &Path, no_display: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    stocketl_chart::render_chart(series, path)?;
    println!("Chart saved to {}", path.display());

    if !no_display {
        stocketl_chart::display_interactive(series);
    }
    Ok(())
}

fn print_head(series: &EnrichedSeries, n: usize) {
    let (gain, loss, neutral) = series.day_type_counts();
    println!();
    println!("=== {} ===", series.symbol);
    match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => println!("Range:  {first} to {last} ({} rows)", series.len()),
        _ => println!("Range:  (empty)"),
    }
    println!("Days:   {gain} gain, {loss} loss, {neutral} neutral");
    println!();
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "date",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "return",
        "vol_7d",
        "mean_20d",
        "mean_50d",
        "day_type"
    );
    for r in series.records.iter().take(n) {
        println!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12.0} {:>10} {:>10} {:>10} {:>10} {:>8}",
            r.date(),
            r.record.open,
            r.record.high,
            r.record.low,
            r.record.close,
            r.record.volume,
            opt(r.daily_return, 4),
            opt(r.volatility_7d, 4),
            opt(r.mean_20d, 2),
            opt(r.mean_50d, 2),
            r.day_type.as_str(),
        );
    }
}

fn opt(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}
