use crate::config::{CrawlSettings, OutputFormat};
use crate::inputs::{load_previous_snapshot, load_urls};
use crate::models::ListingRecord;
use crate::monitoring::{annotate_with_delta, summarize_delta, DeltaSummary};
use crate::outputs::{ensure_parent_dir, export_csv, export_json, export_xlsx};
use crate::scrapers::{HttpFetcher, ImmowebCrawler, ListingExtractor, PageFetcher};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Where a run reads its inputs and writes its outputs
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub urls_file: PathBuf,
    pub output_prefix: PathBuf,
}

impl RunPaths {
    pub fn json(&self) -> PathBuf {
        self.output_prefix.with_extension("json")
    }

    pub fn csv(&self) -> PathBuf {
        self.output_prefix.with_extension("csv")
    }

    pub fn xlsx(&self) -> PathBuf {
        self.output_prefix.with_extension("xlsx")
    }

    pub fn summary(&self) -> PathBuf {
        self.output_prefix.with_extension("summary.json")
    }
}

/// What one run did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub search_urls: usize,
    pub listings: usize,
    /// Absent when delta mode is off
    pub summary: Option<DeltaSummary>,
}

/// Full run against the live site. The HTTP client lives for this call only.
pub async fn run_scraper(
    settings: &CrawlSettings,
    paths: &RunPaths,
    delta_mode: bool,
) -> Result<RunReport> {
    let fetcher = HttpFetcher::new(
        &settings.user_agent,
        settings.request_timeout(),
        settings.retry_policy(),
    )?;
    run_with_fetcher(Arc::new(fetcher), settings, paths, delta_mode).await
}

pub async fn run_with_fetcher<F: PageFetcher + 'static>(
    fetcher: Arc<F>,
    settings: &CrawlSettings,
    paths: &RunPaths,
    delta_mode: bool,
) -> Result<RunReport> {
    let started_at = Utc::now();

    let urls = load_urls(&paths.urls_file).await?;
    info!(count = urls.len(), file = %paths.urls_file.display(), "Loaded search URLs");

    let crawler = ImmowebCrawler::new(fetcher, ListingExtractor::default(), settings.crawl_options());
    let listings = crawler.crawl_search_urls(&urls).await?;
    info!(listings = listings.len(), "Collected listings before delta processing");

    let (annotated, summary) = if delta_mode {
        let previous = load_previous_snapshot(&paths.json()).await;
        let annotated = annotate_with_delta(&previous, &listings);
        let summary = summarize_delta(&annotated);
        info!(
            total = summary.total,
            new = summary.new,
            active = summary.active,
            delisted = summary.delisted,
            "📊 Delta summary"
        );
        (annotated, Some(summary))
    } else {
        info!("Delta mode disabled; skipping delta annotation");
        (listings, None)
    };

    export(&annotated, settings, paths).await?;

    let report = RunReport {
        started_at,
        finished_at: Utc::now(),
        search_urls: urls.len(),
        listings: annotated.len(),
        summary,
    };
    write_report(&report, &paths.summary()).await?;

    Ok(report)
}

async fn export(listings: &[ListingRecord], settings: &CrawlSettings, paths: &RunPaths) -> Result<()> {
    if settings.wants(OutputFormat::Json) {
        let path = paths.json();
        export_json(listings, &path).await?;
        info!(path = %path.display(), "💾 Saved JSON output");
    }
    if settings.wants(OutputFormat::Csv) {
        let path = paths.csv();
        export_csv(listings, &path).await?;
        info!(path = %path.display(), "💾 Saved CSV output");
    }
    if settings.wants(OutputFormat::Excel) {
        let path = paths.xlsx();
        export_xlsx(listings, &path).await?;
        info!(path = %path.display(), "💾 Saved Excel output");
    }
    Ok(())
}

async fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    ensure_parent_dir(path).await?;
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
