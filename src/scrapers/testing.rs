//! In-memory page source for crawl tests.

use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::FetchedPage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub const EMPTY_PAGE: &str = "<html><body><p>No results for your search</p></body></html>";

/// Search results page with one card per listing id
pub fn listing_page(ids: &[&str]) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<article class="card--result">
                     <h2><a href="/en/classified/apartment/for-sale/brussels/1000/{id}">Apartment {id}</a></h2>
                     <p class="card--result__price">€ 250,000</p>
                   </article>"#
            )
        })
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", cards)
}

/// Serves canned bodies by URL and records every request.
///
/// Unknown URLs answer `None`, like a fetch that exhausted its retries.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: String) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        self.requests.lock().unwrap().push(url.to_string());
        tokio::task::yield_now().await;

        self.pages.get(url).map(|body| FetchedPage {
            url: url.to_string(),
            status: 200,
            body: body.clone(),
        })
    }
}
