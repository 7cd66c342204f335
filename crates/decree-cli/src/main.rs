//! Decree Harvest command line.
//!
//! Searches the ALEPE legislation site for decrees published in one month,
//! keeps the PRODEPE and PROIND ones and writes them, enriched with CNPJ and
//! framing, to JSON and CSV files.

use anyhow::Context;
use chrono::Datelike;
use clap::Parser;
use decree_browser::BrowserEngine;
use decree_core::{normalize_year, AppConfig, DateRange};
use decree_scanner::{default_worker_count, export, HarvestOrchestrator, HarvestReport, HttpClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

const JSON_FILE: &str = "programas.json";
const CSV_FILE: &str = "programas.csv";

#[derive(Parser, Debug)]
#[command(
    name = "decree-harvest",
    version,
    about = "Harvest PRODEPE and PROIND decrees published by ALEPE"
)]
struct Cli {
    /// Publication month (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Publication year; two-digit years are expanded
    #[arg(short, long)]
    year: i32,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, env = "DECREE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the exported files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    no_headless: bool,
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,decree=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_env_overrides();
            config.validate()?;
            config
        }
        None => AppConfig::load_with_env()?,
    };
    apply_overrides(cli, &mut config);
    Ok(config)
}

/// Command line flags take precedence over the file and environment.
fn apply_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(output) = &cli.output {
        config.output.directory.clone_from(output);
    }
    if cli.no_headless {
        config.browser.headless = false;
    }
}

fn write_outputs(directory: &Path, report: &HarvestReport) -> anyhow::Result<()> {
    let json = directory.join(JSON_FILE);
    export::write_json(&json, &report.decrees)
        .with_context(|| format!("writing {}", json.display()))?;

    let csv = directory.join(CSV_FILE);
    export::write_csv(&csv, &report.decrees)
        .with_context(|| format!("writing {}", csv.display()))?;
    Ok(())
}

fn print_summary(report: &HarvestReport, directory: &Path, elapsed: f64) {
    println!(
        "Search ready in {:.2}s",
        report.search_time.as_secs_f64()
    );
    println!(
        "Collected {} decrees in {:.2}s",
        report.total_found,
        report.collect_time.as_secs_f64()
    );
    println!("PRODEPE/PROIND decrees: {}", report.classified());
    println!(
        "Enriched in {:.2}s ({} with CNPJ, {} with framing)",
        report.enrich_time.as_secs_f64(),
        report.with_cnpj(),
        report.with_framing()
    );
    println!("Output written to {}", directory.display());
    println!("Total time {elapsed:.2}s");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    info!("Starting Decree Harvest v{}", env!("CARGO_PKG_VERSION"));

    let year = normalize_year(cli.year, chrono::Local::now().year())?;
    let range = DateRange::month(cli.month, year)?;
    let config = load_config(&cli)?;

    let workers = default_worker_count(&config.enrichment);
    let fetcher = Arc::new(HttpClient::new(&config.http, workers)?);
    let browser = Arc::new(
        BrowserEngine::with_settings(&config.browser)
            .await
            .context("launching browser")?,
    );

    let output_dir = config.output.directory.clone();
    let started = Instant::now();
    let orchestrator = HarvestOrchestrator::new(Arc::clone(&browser), fetcher, config, workers);
    let result = orchestrator.run(&range).await;

    if let Err(e) = browser.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }

    let report = result.with_context(|| format!("harvesting decrees published {range}"))?;
    write_outputs(&output_dir, &report)?;
    print_summary(&report, &output_dir, started.elapsed().as_secs_f64());
    Ok(())
}
