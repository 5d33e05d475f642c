use analytics::{
    align, log_returns, rolling_mean, AnalyticsEngine, CompanyStatistics, SmoothedSeries,
};
use anyhow::Context;
use api_client::{fetch_price_series, YahooClient};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

/// The main entry point for the Meridian report application.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Report(args) => {
            if let Err(e) = handle_report(args).await {
                eprintln!("Error generating report: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A one-shot equity risk report: automobile manufacturers vs. a market
/// benchmark.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug-level logging for the pipeline stages.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch prices and render the full risk report.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// The last date of the analysis window (format: YYYY-MM-DD).
    /// Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Overrides the configured trailing lookback window, in calendar days.
    #[arg(long)]
    lookback_days: Option<i64>,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Handles the orchestration of one report run: fetch, transform, compute,
/// render.
async fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let mut config = configuration::load_config()?;
    if let Some(lookback) = args.lookback_days {
        anyhow::ensure!(lookback >= 2, "lookback must be at least 2 days");
        config.report.lookback_days = lookback;
    }

    let end = args.end.unwrap_or_else(|| Local::now().date_naive());
    let start = end - chrono::Duration::days(config.report.lookback_days);

    tracing::info!(%start, %end, benchmark = %config.report.benchmark, "starting report run");

    let client = YahooClient::new(&config.api)?;

    // The benchmark is fetched alongside the companies; everything joins by
    // date afterwards, so fetch order carries no meaning.
    let mut symbols = vec![config.report.benchmark.clone()];
    symbols.extend(config.report.tickers.iter().cloned());

    let progress = ProgressBar::new(symbols.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut return_series = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        progress.set_message(format!("Fetching {symbol}..."));
        let prices = fetch_price_series(&client, symbol, start, end).await?;
        tracing::info!(symbol = %symbol, observations = prices.len(), "fetched price series");
        return_series.push(log_returns(&prices)?);
        progress.inc(1);
    }
    progress.finish_with_message("All symbols fetched");

    let table = align(&return_series)?;
    tracing::info!(rows = table.len(), "aligned return series on shared dates");

    let benchmark_returns = table
        .column(&config.report.benchmark)
        .context("benchmark column missing from the aligned table")?;

    let engine = AnalyticsEngine::new(
        config.report.annual_risk_free_rate,
        config.report.var_confidence,
    );

    let mut statistics = Vec::with_capacity(config.report.tickers.len());
    for ticker in &config.report.tickers {
        let company_returns = table
            .column(ticker)
            .with_context(|| format!("column for '{ticker}' missing from the aligned table"))?;
        statistics.push(engine.calculate(ticker, company_returns, benchmark_returns)?);
    }

    // Smoothing is a display branch only; statistics above never see it.
    let smoothed: Vec<SmoothedSeries> = return_series
        .iter()
        .map(|series| rolling_mean(series, config.report.rolling_window))
        .collect::<Result<_, _>>()?;

    println!();
    println!(
        "Risk statistics vs. {} ({} shared trading days, {} to {})",
        config.report.benchmark,
        table.len(),
        start,
        end
    );
    println!("{}", statistics_table(&statistics));
    println!();
    println!(
        "Trailing {}-day mean of daily log returns",
        config.report.rolling_window
    );
    println!("{}", smoothing_table(&smoothed));

    Ok(())
}

// ==============================================================================
// Table Rendering
// ==============================================================================

fn statistics_table(statistics: &[CompanyStatistics]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Symbol",
            "Obs",
            "Mean daily",
            "Beta",
            "Sharpe",
            "VaR 95%",
            "t-stat",
            "p-value",
            "95% CI of mean diff",
        ]);

    for s in statistics {
        table.add_row(vec![
            Cell::new(&s.symbol),
            Cell::new(s.observations),
            Cell::new(format_stat(s.mean_daily_return, 6)),
            Cell::new(format_stat(s.beta, 4)),
            Cell::new(format_stat(s.sharpe_ratio, 4)),
            Cell::new(format_stat(s.var_95, 4)),
            Cell::new(format_stat(s.t_statistic, 4)),
            Cell::new(format_stat(s.p_value, 4)),
            Cell::new(format!(
                "[{}, {}]",
                format_stat(s.ci_lower, 6),
                format_stat(s.ci_upper, 6)
            )),
        ]);
    }

    table
}

fn smoothing_table(smoothed: &[SmoothedSeries]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Symbol", "Defined days", "Latest date", "Latest", "Min", "Max"]);

    for series in smoothed {
        let defined = series
            .points()
            .iter()
            .filter(|p| p.value.is_some())
            .count();
        let (latest_date, latest_value) = match series.latest() {
            Some((date, value)) => (date.to_string(), format_stat(value, 6)),
            None => ("n/a".to_string(), "n/a".to_string()),
        };

        table.add_row(vec![
            Cell::new(series.symbol()),
            Cell::new(defined),
            Cell::new(latest_date),
            Cell::new(latest_value),
            Cell::new(series.min().map_or("n/a".to_string(), |v| format_stat(v, 6))),
            Cell::new(series.max().map_or("n/a".to_string(), |v| format_stat(v, 6))),
        ]);
    }

    table
}

/// Formats a statistic for display; degenerate (NaN) values render as "n/a".
fn format_stat(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
