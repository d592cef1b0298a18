//! Field probes for listing cards.
//!
//! Every field is an ordered chain of small probes; the first one that yields
//! a value wins. Probes never fail, they answer `None` when the markup does
//! not cooperate. Text probes work on the card's flattened text so they can be
//! exercised without any HTML.

use scraper::{ElementRef, Selector};

const PRICE_CLASSES: &[&str] = &["price", "result-xl-price", "classified__price"];
const LOCATION_CLASSES: &[&str] = &[
    "locality",
    "result-xl-locality",
    "classified__information--address",
];
const TYPE_CLASSES: &[&str] = &["property-type", "result-xl-property-type", "classified__type"];
const BEDROOM_CLASSES: &[&str] = &["bedrooms", "bedroom-count"];
const BATHROOM_CLASSES: &[&str] = &["bathrooms", "bathroom-count"];
const AREA_CLASSES: &[&str] = &["surface", "living-area"];
const ENERGY_CLASSES: &[&str] = &["epc", "energy-class"];
const PUBLISHER_CLASSES: &[&str] = &[
    "agency-name",
    "publisher",
    "classified__information--agency",
];
const DATE_CLASSES: &[&str] = &["date", "posted-date", "classified__publish-date"];

const PROPERTY_TYPES: &[&str] = &["Apartment", "House", "Studio", "Villa", "Loft"];
const BEDROOM_LABELS: &[&str] = &[
    "bedroom",
    "bedrooms",
    "chambre",
    "chambres",
    "slaapkamer",
    "slaapkamers",
];
const BATHROOM_LABELS: &[&str] = &[
    "bathroom",
    "bathrooms",
    "sdb",
    "salle de bain",
    "badkamer",
    "badkamers",
];
const AREA_MARKERS: &[&str] = &["m²", "m2"];
const ENERGY_LABELS: &[&str] = &["PEB", "EPC"];
const CLASSIFIED_PATHS: &[&str] = &["/en/classified", "/fr/classified", "/nl/classified"];

/// Characters looked at before a room label
const LABEL_WINDOW: usize = 6;
/// Characters looked at before an area marker
const AREA_WINDOW: usize = 8;
const MIN_PHONE_DIGITS: usize = 8;

/// One candidate listing fragment with its flattened text
pub struct Card<'a> {
    element: ElementRef<'a>,
    text: String,
}

impl<'a> Card<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        let text = join_fragments(element);
        Self { element, text }
    }

    /// Visible text of the card, fragments joined by single spaces
    pub fn text(&self) -> &str {
        &self.text
    }

    fn first(&self, css: &str) -> Option<ElementRef<'a>> {
        let selector = Selector::parse(css).ok()?;
        self.element.select(&selector).next()
    }

    fn all(&self, css: &str) -> Vec<ElementRef<'a>> {
        match Selector::parse(css) {
            Ok(selector) => self.element.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn fragments(&self) -> impl Iterator<Item = &'a str> {
        self.element.text().map(str::trim).filter(|t| !t.is_empty())
    }
}

fn join_fragments(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    Some(join_fragments(element)).filter(|t| !t.is_empty())
}

// ---- field chains -------------------------------------------------------

pub fn title(card: &Card) -> Option<String> {
    ["h2", "h3", "h1"]
        .iter()
        .find_map(|tag| card.first(tag))
        .and_then(element_text)
}

pub fn description(card: &Card) -> Option<String> {
    card.first("p").and_then(element_text)
}

pub fn price(card: &Card) -> Option<String> {
    class_hint_text(card, PRICE_CLASSES).or_else(|| currency_fragment(card))
}

pub fn location(card: &Card) -> Option<String> {
    class_hint_text(card, LOCATION_CLASSES).or_else(|| card.first("small").and_then(element_text))
}

pub fn property_type(card: &Card) -> Option<String> {
    class_hint_text(card, TYPE_CLASSES).or_else(|| property_type_keyword(card.text()))
}

pub fn bedrooms(card: &Card) -> Option<u32> {
    class_hint_number(card, BEDROOM_CLASSES)
        .or_else(|| labelled_count(card.text(), BEDROOM_LABELS))
}

pub fn bathrooms(card: &Card) -> Option<u32> {
    class_hint_number(card, BATHROOM_CLASSES)
        .or_else(|| labelled_count(card.text(), BATHROOM_LABELS))
}

pub fn area(card: &Card) -> Option<u32> {
    class_hint_number(card, AREA_CLASSES).or_else(|| area_before_marker(card.text()))
}

pub fn energy_class(card: &Card) -> Option<String> {
    class_hint_text(card, ENERGY_CLASSES).or_else(|| energy_label(card.text()))
}

pub fn publisher(card: &Card) -> Option<String> {
    class_hint_text(card, PUBLISHER_CLASSES)
}

pub fn contact(card: &Card) -> Option<String> {
    phone_fragment(card.text())
}

pub fn date_posted(card: &Card) -> Option<String> {
    class_hint_text(card, DATE_CLASSES)
}

/// Link to the listing page, preferring classified detail pages.
/// Empty `href` attributes are not links.
pub fn listing_href<'a>(card: &Card<'a>) -> Option<&'a str> {
    let hrefs: Vec<&'a str> = card
        .all("a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .collect();

    hrefs
        .iter()
        .find(|href| CLASSIFIED_PATHS.iter().any(|p| href.contains(p)))
        .or_else(|| hrefs.first())
        .copied()
}

/// Image URLs in document order, lazy-load source first, inline data skipped
pub fn photos(card: &Card) -> Vec<String> {
    let mut photos: Vec<String> = Vec::new();
    for img in card.all("img") {
        let attrs = img.value();
        let src = attrs
            .attr("data-src")
            .filter(|s| !s.is_empty())
            .or_else(|| attrs.attr("src"))
            .filter(|s| !s.is_empty());

        match src {
            Some(src) if !src.starts_with("data:") => {
                if !photos.iter().any(|p| p == src) {
                    photos.push(src.to_string());
                }
            }
            _ => {}
        }
    }
    photos
}

// ---- individual probes --------------------------------------------------

fn class_hint_text(card: &Card, classes: &[&str]) -> Option<String> {
    classes
        .iter()
        .filter_map(|class| card.first(&format!(".{}", class)))
        .find_map(element_text)
}

fn class_hint_number(card: &Card, classes: &[&str]) -> Option<u32> {
    classes
        .iter()
        .filter_map(|class| card.first(&format!(".{}", class)))
        .find_map(|el| first_integer(&join_fragments(el)))
}

fn currency_fragment(card: &Card) -> Option<String> {
    card.fragments()
        .find(|t| t.starts_with('€') || t.contains("EUR"))
        .map(str::to_string)
}

fn property_type_keyword(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    PROPERTY_TYPES
        .iter()
        .find(|kind| lower.contains(&kind.to_lowercase()))
        .map(|kind| kind.to_string())
}

fn labelled_count(text: &str, labels: &[&str]) -> Option<u32> {
    let lower = text.to_lowercase();
    labels.iter().find_map(|label| {
        let idx = lower.find(label)?;
        first_integer(window_before(&lower, idx, LABEL_WINDOW))
    })
}

fn area_before_marker(text: &str) -> Option<u32> {
    AREA_MARKERS.iter().find_map(|marker| {
        let idx = text.find(marker)?;
        first_integer(window_before(text, idx, AREA_WINDOW))
    })
}

fn energy_label(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    ENERGY_LABELS.iter().find_map(|label| {
        let idx = upper.find(label)?;
        let grade = upper[idx + label.len()..]
            .chars()
            .find(|c| !(c.is_whitespace() || matches!(c, ':' | '-')))?;
        ('A'..='G')
            .contains(&grade)
            .then(|| format!("{} {}", label, grade))
    })
}

fn phone_fragment(text: &str) -> Option<String> {
    let kept: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_digit() || matches!(c, '+' | '-') {
                c
            } else {
                ' '
            }
        })
        .collect();

    kept.split_whitespace()
        .find(|part| part.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS)
        .map(str::to_string)
}

/// First run of ASCII digits in `text`
fn first_integer(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Up to `chars` characters of `text` ending right before byte offset `end`
fn window_before(text: &str, end: usize, chars: usize) -> &str {
    let head = &text[..end];
    let start = head
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(end);
    &head[start..]
}
