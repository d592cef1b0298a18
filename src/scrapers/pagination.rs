use crate::models::ListingRecord;
use crate::scrapers::extractor::ListingExtractor;
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::CrawlOptions;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use url::Url;

/// Set (or override) the `page` query parameter of a search URL
pub fn build_paged_url(base_url: &str, page: u32) -> Result<String> {
    let mut url =
        Url::parse(base_url).with_context(|| format!("Invalid search URL: {}", base_url))?;

    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in url.query_pairs().into_owned() {
        if key == "page" {
            if !replaced {
                pairs.push((key, page.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((key, value));
        }
    }
    if !replaced {
        pairs.push(("page".to_string(), page.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(url.into())
}

/// Why a search stopped requesting pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page could not be fetched at all
    NoContent,
    /// A page came back without listings, taken as the end of the results
    NoListings,
    /// The configured page limit was reached
    MaxPages,
}

/// Outcome of crawling one search URL
#[derive(Debug)]
pub struct SearchCrawl {
    pub search_url: String,
    pub listings: Vec<ListingRecord>,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
}

/// Walks the result pages of one search, strictly one page after the other
pub struct PaginationWalker<F> {
    fetcher: Arc<F>,
    extractor: Arc<ListingExtractor>,
    permits: Arc<Semaphore>,
    options: CrawlOptions,
}

impl<F: PageFetcher> PaginationWalker<F> {
    pub fn new(
        fetcher: Arc<F>,
        extractor: Arc<ListingExtractor>,
        permits: Arc<Semaphore>,
        options: CrawlOptions,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            permits,
            options,
        }
    }

    pub async fn walk(&self, search_url: &str) -> Result<SearchCrawl> {
        info!(search_url, "Crawling search URL");

        let mut listings = Vec::new();
        let mut pages_fetched = 0;
        let mut stop_reason = StopReason::MaxPages;

        for page in 1..=self.options.max_pages {
            let page_url = build_paged_url(search_url, page)?;

            let fetched = {
                let _permit = self
                    .permits
                    .acquire()
                    .await
                    .context("Fetch permit pool closed")?;
                self.fetcher.fetch(&page_url).await
            };
            pages_fetched += 1;

            let Some(fetched) = fetched else {
                warn!(%page_url, "Empty response; stopping pagination for this search URL");
                stop_reason = StopReason::NoContent;
                break;
            };
            if !fetched.is_success() {
                warn!(%page_url, status = fetched.status, "Parsing page despite non-success status");
            }

            let page_listings = self.extractor.extract_page(&fetched, search_url);
            info!(page, search_url, listings = page_listings.len(), "Page extracted");

            if page_listings.is_empty() {
                stop_reason = StopReason::NoListings;
                break;
            }
            listings.extend(page_listings);

            if page < self.options.max_pages {
                tokio::time::sleep(self.options.page_delay).await;
            }
        }

        Ok(SearchCrawl {
            search_url: search_url.to_string(),
            listings,
            pages_fetched,
            stop_reason,
        })
    }
}
