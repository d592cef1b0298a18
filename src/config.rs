use crate::scrapers::types::{CrawlOptions, RetryPolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Output files a run can produce
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Excel,
    /// Any name this build does not know; dropped when settings load
    #[serde(other)]
    Unknown,
}

/// Run settings, read from a JSON file; every key is optional
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrawlSettings {
    pub max_pages_to_scrape: u32,
    pub concurrency: usize,
    /// Seconds
    pub request_timeout: u64,
    /// Seconds between two pages of one search
    pub request_delay: f64,
    pub user_agent: String,
    pub output_formats: Vec<OutputFormat>,
    pub delta_mode_enabled: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_pages_to_scrape: 3,
            concurrency: 5,
            request_timeout: 30,
            request_delay: 0.5,
            user_agent: "ImmowebMassScraper/1.0".to_string(),
            output_formats: vec![OutputFormat::Json, OutputFormat::Csv, OutputFormat::Excel],
            delta_mode_enabled: true,
        }
    }
}

impl CrawlSettings {
    /// Load settings from `path`, falling back to defaults when it does not exist
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            info!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;

        Ok(settings.normalized())
    }

    fn normalized(mut self) -> Self {
        if self.max_pages_to_scrape == 0 {
            warn!("max_pages_to_scrape must be at least 1; using 1");
            self.max_pages_to_scrape = 1;
        }
        if self.concurrency == 0 {
            warn!("concurrency must be at least 1; using 1");
            self.concurrency = 1;
        }
        if Duration::try_from_secs_f64(self.request_delay).is_err() {
            warn!(request_delay = self.request_delay, "Invalid request_delay; using 0");
            self.request_delay = 0.0;
        }
        let before = self.output_formats.len();
        self.output_formats.retain(|format| *format != OutputFormat::Unknown);
        if self.output_formats.len() < before {
            warn!(
                ignored = before - self.output_formats.len(),
                "Ignoring unrecognized output formats"
            );
        }
        self
    }

    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            max_pages: self.max_pages_to_scrape,
            concurrency: self.concurrency,
            page_delay: Duration::try_from_secs_f64(self.request_delay).unwrap_or_default(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    pub fn wants(&self, format: OutputFormat) -> bool {
        self.output_formats.contains(&format)
    }
}
