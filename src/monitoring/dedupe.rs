use crate::models::ListingRecord;
use std::collections::HashSet;

/// Keep the first record seen for each identity key.
///
/// Records without a key are never treated as duplicates and always stay.
pub fn dedupe(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| match record.identity_key() {
            Some(key) => seen.insert(key.to_string()),
            None => true,
        })
        .collect()
}
