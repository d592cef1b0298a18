use crate::scrapers::types::FetchedPage;
use async_trait::async_trait;

/// Source of search result pages.
///
/// The HTTP implementation lives in `fetcher`; tests plug in scripted pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page. `None` means no content could be obtained, even after
    /// retrying; failures are never raised to the caller.
    async fn fetch(&self, url: &str) -> Option<FetchedPage>;
}
