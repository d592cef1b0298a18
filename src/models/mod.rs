use serde::{Deserialize, Serialize};

/// Lifecycle status of a listing relative to the previous run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringStatus {
    #[default]
    Unknown,
    New,
    Active,
    Delisted,
}

/// One property advertisement scraped from a search results page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingRecord {
    pub id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Raw price text as shown on the card, e.g. "€350,000"
    pub price: Option<String>,
    pub photos: Vec<String>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    /// Living area in square meters
    pub area: Option<u32>,
    pub energy_class: Option<String>,
    pub publisher: Option<String>,
    pub contact: Option<String>,
    pub date_posted: Option<String>,
    #[serde(alias = "apify_monitoring_status")]
    pub monitoring_status: MonitoringStatus,
    pub search_url: Option<String>,
}

impl ListingRecord {
    /// Key used to match a listing across snapshots: the id, else the url.
    ///
    /// Blank values do not count. Records without a key can be neither
    /// deduplicated nor delta-matched.
    pub fn identity_key(&self) -> Option<&str> {
        non_blank(&self.id).or_else(|| non_blank(&self.url))
    }

    /// Copy of this record carrying the given status
    pub fn with_status(&self, status: MonitoringStatus) -> Self {
        Self {
            monitoring_status: status,
            ..self.clone()
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
