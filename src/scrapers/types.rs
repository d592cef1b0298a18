use std::time::Duration;

/// Body of one fetched page together with the HTTP status it arrived with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    /// Whether the page came back with a 2xx status.
    ///
    /// Non-2xx pages are still handed to the extractor; this only lets
    /// callers tell them apart.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retry schedule for transport failures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub factor: f64,
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        self.base_delay.mul_f64(self.factor.powi(exponent))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            factor: 1.5,
        }
    }
}

/// Crawl parameters shared by every search of a run
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Upper bound on result pages visited per search URL
    pub max_pages: u32,
    /// Page fetches allowed in flight across all searches
    pub concurrency: usize,
    /// Pause between two pages of the same search
    pub page_delay: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: 3,
            concurrency: 5,
            page_delay: Duration::from_millis(500),
        }
    }
}
