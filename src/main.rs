mod cli;
mod config;
mod inputs;
mod models;
mod monitoring;
mod outputs;
mod runner;
mod scrapers;

use clap::Parser;
use cli::Cli;
use config::CrawlSettings;
use runner::{run_scraper, RunPaths};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🏠 Immoweb Scout");

    let result = run(&cli).await;
    if let Err(e) = &result {
        error!(error = ?e, "Unexpected error during scraping");
    }
    result
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = CrawlSettings::load(&cli.config).await?;
    let delta_mode = settings.delta_mode_enabled && !cli.no_delta;
    tracing::debug!(?settings, delta_mode, "Using configuration");

    let paths = RunPaths {
        urls_file: cli.urls_file.clone(),
        output_prefix: cli.output_prefix.clone(),
    };

    let report = run_scraper(&settings, &paths, delta_mode).await?;

    info!(
        search_urls = report.search_urls,
        listings = report.listings,
        elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
        "✅ Run finished"
    );

    Ok(())
}
