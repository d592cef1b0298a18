use super::{ensure_parent_dir, tabulate};
use crate::models::ListingRecord;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Header written when there is nothing to export
const NO_DATA_HEADER: &str = "no_data";

/// Write listings as CSV, columns being the sorted union of record keys
pub async fn export_csv(listings: &[ListingRecord], path: &Path) -> Result<()> {
    ensure_parent_dir(path).await?;

    let bytes = render_csv(listings)?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn render_csv(listings: &[ListingRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if listings.is_empty() {
        writer.write_record([NO_DATA_HEADER])?;
        return writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV: {}", e.error()));
    }

    let (header, rows) = tabulate(listings)?;

    writer.write_record(&header)?;
    for row in &rows {
        writer.write_record(header.iter().map(|key| cell(row.get(key))))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV: {}", e.error()))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_export_has_placeholder_header() {
        let bytes = render_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "no_data\n");
    }

    #[tokio::test]
    async fn columns_are_sorted_and_cells_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/listings.csv");
        let listings = vec![ListingRecord {
            id: Some("100".to_string()),
            bedrooms: Some(3),
            photos: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            ..Default::default()
        }];

        export_csv(&listings, &path).await.unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        let mut sorted = header.clone();
        sorted.sort();
        assert_eq!(header, sorted);
        assert_eq!(header.len(), 17);

        let row = reader.records().next().unwrap().unwrap();
        let column = |name: &str| header.iter().position(|h| h == name).unwrap();
        assert_eq!(&row[column("id")], "100");
        assert_eq!(&row[column("bedrooms")], "3");
        assert_eq!(&row[column("photos")], r#"["a.jpg","b.jpg"]"#);
        assert_eq!(&row[column("price")], "");
        assert_eq!(&row[column("monitoringStatus")], "unknown");
    }
}
