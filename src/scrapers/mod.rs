pub mod crawler;
pub mod extractor;
pub mod fetcher;
pub mod pagination;
pub mod probes;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use crawler::ImmowebCrawler;
pub use extractor::ListingExtractor;
pub use fetcher::HttpFetcher;
pub use traits::PageFetcher;
