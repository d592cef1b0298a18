use crate::models::ListingRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("URLs file not found: {}", .0.display())]
    UrlsFileNotFound(PathBuf),
    #[error("No URLs found in {}", .0.display())]
    NoSearchUrls(PathBuf),
    #[error("No search URLs to crawl")]
    EmptySearchList,
}

/// Search URLs listed one per line; blank lines and `#` comments are skipped
pub fn parse_urls(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub async fn load_urls(path: &Path) -> Result<Vec<String>> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(InputError::UrlsFileNotFound(path.to_path_buf()).into());
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let urls = parse_urls(&contents);
    if urls.is_empty() {
        return Err(InputError::NoSearchUrls(path.to_path_buf()).into());
    }
    Ok(urls)
}

/// Records of the previous run.
///
/// A missing or unreadable file, malformed JSON or anything but an array all
/// mean "no previous snapshot". Array entries that are not listing objects
/// are dropped on their own.
pub async fn load_previous_snapshot(path: &Path) -> Vec<ListingRecord> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No previous snapshot");
            return Vec::new();
        }
    };

    parse_snapshot(&contents)
}

pub fn parse_snapshot(contents: &str) -> Vec<ListingRecord> {
    let entries = match serde_json::from_str::<serde_json::Value>(contents) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("Previous snapshot is not a JSON array; ignoring it");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Previous snapshot is not valid JSON; ignoring it");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<ListingRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = idx, error = %e, "Skipping unreadable snapshot entry");
                None
            }
        })
        .collect()
}
