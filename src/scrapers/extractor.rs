use crate::models::{ListingRecord, MonitoringStatus};
use crate::scrapers::probes::{self, Card};
use crate::scrapers::types::FetchedPage;
use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

pub const IMMOWEB_BASE_URL: &str = "https://www.immoweb.be";

/// Card selectors tried in order; the first one matching anything wins
const CARD_SELECTORS: &[&str] = &["article", ".search-result", ".result-xl"];
/// Last resort: anything tagged with a listing id
const FALLBACK_CARD_SELECTOR: &str = "[data-id]";

/// Turns search result pages into listing records
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    base_url: Url,
}

impl ListingExtractor {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("Invalid listing site base URL")?;
        Ok(Self { base_url })
    }

    /// Extract listings from a fetched page, whatever status it came with
    pub fn extract_page(&self, page: &FetchedPage, search_url: &str) -> Vec<ListingRecord> {
        if !page.is_success() {
            debug!(url = %page.url, status = page.status, "Extracting from non-success page");
        }
        self.extract(&page.body, search_url)
    }

    /// Extract every listing card of an HTML document.
    ///
    /// Best effort: fields that cannot be found stay empty, and a card is only
    /// dropped when it has neither a title nor a link.
    pub fn extract(&self, html: &str, search_url: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);

        let cards = select_cards(&document);
        debug!(cards = cards.len(), "Selected candidate cards");

        cards
            .into_iter()
            .filter_map(|element| self.build_record(&Card::new(element), search_url))
            .collect()
    }

    fn build_record(&self, card: &Card, search_url: &str) -> Option<ListingRecord> {
        let title = probes::title(card);
        let url = probes::listing_href(card).and_then(|href| self.resolve(href));

        if title.is_none() && url.is_none() {
            return None;
        }

        Some(ListingRecord {
            id: url.as_deref().and_then(listing_id_from_url),
            url,
            title,
            description: probes::description(card),
            price: probes::price(card),
            photos: probes::photos(card),
            location: probes::location(card),
            property_type: probes::property_type(card),
            bedrooms: probes::bedrooms(card),
            bathrooms: probes::bathrooms(card),
            area: probes::area(card),
            energy_class: probes::energy_class(card),
            publisher: probes::publisher(card),
            contact: probes::contact(card),
            date_posted: probes::date_posted(card),
            monitoring_status: MonitoringStatus::Unknown,
            search_url: Some(search_url.to_string()),
        })
    }

    fn resolve(&self, href: &str) -> Option<String> {
        self.base_url.join(href).ok().map(String::from)
    }
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new(IMMOWEB_BASE_URL).expect("Failed to create default ListingExtractor")
    }
}

fn select_cards(document: &Html) -> Vec<scraper::ElementRef<'_>> {
    CARD_SELECTORS
        .iter()
        .chain(std::iter::once(&FALLBACK_CARD_SELECTOR))
        .filter_map(|css| Selector::parse(css).ok())
        .map(|selector| document.select(&selector).collect::<Vec<_>>())
        .find(|cards| !cards.is_empty())
        .unwrap_or_default()
}

/// Last purely numeric segment of the URL path, e.g. the `10234567` of
/// `/en/classified/house/for-sale/gent/9000/10234567`
pub fn listing_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path()
        .rsplit('/')
        .find(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}
