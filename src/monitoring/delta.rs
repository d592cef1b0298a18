use crate::models::{ListingRecord, MonitoringStatus};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Status counts over an annotated snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub total: usize,
    pub new: usize,
    pub active: usize,
    pub delisted: usize,
}

/// Index records by identity key, keeping key order of first appearance.
///
/// A repeated key keeps its position but takes the later record.
fn build_index(records: &[ListingRecord]) -> (Vec<&str>, HashMap<&str, &ListingRecord>) {
    let mut order = Vec::new();
    let mut index = HashMap::new();
    for record in records {
        if let Some(key) = record.identity_key() {
            if index.insert(key, record).is_none() {
                order.push(key);
            }
        }
    }
    (order, index)
}

/// Annotate the current snapshot against the previous one.
///
/// Current records come first, in their order, marked `new` or `active`
/// (`unknown` when they have no identity key). Every previously known key
/// missing from the current snapshot is appended as a `delisted` copy of the
/// previous record.
pub fn annotate_with_delta(
    previous: &[ListingRecord],
    current: &[ListingRecord],
) -> Vec<ListingRecord> {
    let (previous_order, previous_index) = build_index(previous);
    let current_keys: HashSet<&str> = current.iter().filter_map(|r| r.identity_key()).collect();

    let mut annotated: Vec<ListingRecord> = current
        .iter()
        .map(|record| {
            let status = match record.identity_key() {
                Some(key) if previous_index.contains_key(key) => MonitoringStatus::Active,
                Some(_) => MonitoringStatus::New,
                None => MonitoringStatus::Unknown,
            };
            record.with_status(status)
        })
        .collect();

    annotated.extend(
        previous_order
            .into_iter()
            .filter(|key| !current_keys.contains(key))
            .filter_map(|key| previous_index.get(key))
            .map(|record| record.with_status(MonitoringStatus::Delisted)),
    );

    annotated
}

pub fn summarize_delta(annotated: &[ListingRecord]) -> DeltaSummary {
    annotated.iter().fold(
        DeltaSummary {
            total: annotated.len(),
            ..Default::default()
        },
        |mut summary, record| {
            match record.monitoring_status {
                MonitoringStatus::New => summary.new += 1,
                MonitoringStatus::Active => summary.active += 1,
                MonitoringStatus::Delisted => summary.delisted += 1,
                MonitoringStatus::Unknown => {}
            }
            summary
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str) -> ListingRecord {
        ListingRecord {
            id: Some(id.to_string()),
            url: Some(format!("https://www.immoweb.be/en/classified/{}", id)),
            ..Default::default()
        }
    }

    fn statuses(annotated: &[ListingRecord]) -> Vec<(Option<&str>, MonitoringStatus)> {
        annotated
            .iter()
            .map(|r| (r.id.as_deref(), r.monitoring_status))
            .collect()
    }

    #[test]
    fn known_listing_is_active_and_unseen_is_new() {
        let previous = vec![ListingRecord {
            id: Some("100".to_string()),
            url: Some("https://www.immoweb.be/en/classified/old-url/100".to_string()),
            ..Default::default()
        }];
        let current = vec![listing("100"), listing("200")];

        let annotated = annotate_with_delta(&previous, &current);

        assert_eq!(
            statuses(&annotated),
            vec![
                (Some("100"), MonitoringStatus::Active),
                (Some("200"), MonitoringStatus::New),
            ]
        );
        assert_eq!(
            summarize_delta(&annotated),
            DeltaSummary {
                total: 2,
                new: 1,
                active: 1,
                delisted: 0
            }
        );
    }

    #[test]
    fn missing_listings_are_appended_as_delisted_unchanged() {
        let mut gone = listing("300");
        gone.price = Some("€199,000".to_string());
        gone.monitoring_status = MonitoringStatus::Active;
        let previous = vec![listing("100"), gone.clone()];
        let current = vec![listing("100")];

        let annotated = annotate_with_delta(&previous, &current);

        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[1], gone.with_status(MonitoringStatus::Delisted));
        assert_eq!(summarize_delta(&annotated).delisted, 1);
    }

    #[test]
    fn keyless_records_are_unknown_and_never_delisted() {
        let keyless = ListingRecord {
            title: Some("Loft without link".to_string()),
            ..Default::default()
        };
        let previous = vec![keyless.clone()];
        let current = vec![keyless, listing("1")];

        let annotated = annotate_with_delta(&previous, &current);
        let summary = summarize_delta(&annotated);

        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[0].monitoring_status, MonitoringStatus::Unknown);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.new + summary.active + summary.delisted, 1);
    }

    #[test]
    fn url_is_the_key_when_id_is_absent() {
        let by_url = |url: &str| ListingRecord {
            url: Some(url.to_string()),
            ..Default::default()
        };
        let previous = vec![by_url("https://www.immoweb.be/a"), by_url("https://www.immoweb.be/b")];
        let current = vec![by_url("https://www.immoweb.be/a")];

        let annotated = annotate_with_delta(&previous, &current);

        assert_eq!(annotated[0].monitoring_status, MonitoringStatus::Active);
        assert_eq!(annotated[1].url.as_deref(), Some("https://www.immoweb.be/b"));
        assert_eq!(annotated[1].monitoring_status, MonitoringStatus::Delisted);
    }

    #[test]
    fn repeated_previous_key_yields_last_record_at_first_position() {
        let mut first = listing("5");
        first.title = Some("first".to_string());
        let mut second = listing("5");
        second.title = Some("second".to_string());
        let previous = vec![first, listing("6"), second];

        let annotated = annotate_with_delta(&previous, &[]);

        assert_eq!(
            statuses(&annotated),
            vec![
                (Some("5"), MonitoringStatus::Delisted),
                (Some("6"), MonitoringStatus::Delisted),
            ]
        );
        assert_eq!(annotated[0].title.as_deref(), Some("second"));
    }

    #[test]
    fn empty_previous_marks_everything_new() {
        let annotated = annotate_with_delta(&[], &[listing("1"), listing("2")]);
        assert!(annotated
            .iter()
            .all(|r| r.monitoring_status == MonitoringStatus::New));
    }
}
