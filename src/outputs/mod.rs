pub mod csv_export;
pub mod json_export;
pub mod xlsx_export;

pub use csv_export::export_csv;
pub use json_export::export_json;
pub use xlsx_export::export_xlsx;

use crate::models::ListingRecord;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;

pub(crate) async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display())),
        _ => Ok(()),
    }
}

/// Records as JSON objects, plus the sorted union of their keys
pub(crate) fn tabulate(listings: &[ListingRecord]) -> Result<(Vec<String>, Vec<Map<String, Value>>)> {
    let rows: Vec<Map<String, Value>> = listings
        .iter()
        .map(|listing| match serde_json::to_value(listing) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(Map::new()),
            Err(e) => Err(e),
        })
        .collect::<Result<_, _>>()?;

    let header: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();
    let header = header.into_iter().map(str::to_string).collect();

    Ok((header, rows))
}
