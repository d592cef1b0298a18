use super::ensure_parent_dir;
use crate::models::ListingRecord;
use anyhow::{Context, Result};
use std::path::Path;

/// Write listings as a pretty-printed JSON array
pub async fn export_json(listings: &[ListingRecord], path: &Path) -> Result<()> {
    ensure_parent_dir(path).await?;

    let json = serde_json::to_string_pretty(listings)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
