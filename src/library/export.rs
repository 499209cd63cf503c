//! Writing catalog snapshots to JSON files.
//!
//! This is a convenience for host programs, not a storage engine: the file is
//! written once and never read back by the catalog.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;

use crate::domain::Document;

/// On-disk shape of an exported snapshot
#[derive(Debug, Serialize)]
pub struct SnapshotFile<'a> {
    /// Export format version
    pub version: u32,

    /// When the snapshot was written
    pub exported_at: DateTime<Utc>,

    /// Exported documents in snapshot order
    pub documents: Vec<&'a Document>,
}

/// Serialize `documents` as pretty JSON into `path`
pub async fn export_snapshot(documents: &[Arc<Document>], path: &Path) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let file = SnapshotFile {
        version: 1,
        exported_at: Utc::now(),
        documents: documents.iter().map(|d| &**d).collect(),
    };

    let content = serde_json::to_string_pretty(&file).context("Failed to serialize snapshot")?;
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

    tracing::info!(count = documents.len(), path = %path.display(), "Exported snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_export_snapshot_writes_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("books.json");

        let docs = vec![Arc::new(
            Document::builder()
                .title("Java Guide")
                .author("Oracle")
                .year(2020)
                .isbn("123")
                .build()
                .unwrap(),
        )];

        export_snapshot(&docs, &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["documents"][0]["title"], "Java Guide");
        assert_eq!(json["documents"].as_array().unwrap().len(), 1);
    }
}
