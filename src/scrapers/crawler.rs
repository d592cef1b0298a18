use crate::inputs::InputError;
use crate::models::ListingRecord;
use crate::monitoring::dedupe;
use crate::scrapers::extractor::ListingExtractor;
use crate::scrapers::pagination::PaginationWalker;
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::CrawlOptions;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Crawls many search URLs at once under one shared fetch budget
pub struct ImmowebCrawler<F> {
    fetcher: Arc<F>,
    extractor: Arc<ListingExtractor>,
    options: CrawlOptions,
}

impl<F: PageFetcher + 'static> ImmowebCrawler<F> {
    pub fn new(fetcher: Arc<F>, extractor: ListingExtractor, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            options,
        }
    }

    /// Crawl every search URL and return the deduplicated listings.
    ///
    /// One task per search; all of them draw page fetches from the same permit
    /// pool. A search that fails only loses its own listings.
    pub async fn crawl_search_urls(&self, urls: &[String]) -> Result<Vec<ListingRecord>> {
        if urls.is_empty() {
            return Err(InputError::EmptySearchList.into());
        }

        let permits = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for url in urls {
            let walker = PaginationWalker::new(
                self.fetcher.clone(),
                self.extractor.clone(),
                permits.clone(),
                self.options.clone(),
            );
            let search_url = url.trim().to_string();
            tasks.spawn(async move { walker.walk(&search_url).await });
        }

        let mut listings = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(crawl)) => {
                    info!(
                        search_url = %crawl.search_url,
                        pages = crawl.pages_fetched,
                        listings = crawl.listings.len(),
                        stop = ?crawl.stop_reason,
                        "Search finished"
                    );
                    listings.extend(crawl.listings);
                }
                Ok(Err(e)) => warn!(error = %e, "Search failed; skipping its listings"),
                Err(e) => error!(error = %e, "Search task aborted"),
            }
        }

        info!(collected = listings.len(), "All searches finished");
        let deduped = dedupe(listings);
        info!(listings = deduped.len(), "After deduplication");

        Ok(deduped)
    }
}
