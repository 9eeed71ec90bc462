//! The persisted video registry: pending paths plus classified records.

use crate::models::VideoRecord;
use anyhow::bail;
use std::collections::HashSet;

pub mod json;
pub mod sqlite;

pub use json::JsonRegistry;
pub use sqlite::SqliteRegistry;

#[async_trait::async_trait]
pub trait VideoRegistry: Send + Sync {
    /// Known-but-unclassified paths in stored order.
    async fn list_pending(&self) -> anyhow::Result<Vec<String>>;

    /// Stores the video paths among `paths` with set semantics. Returns the
    /// number of newly stored paths.
    async fn append_pending(&self, paths: &[String]) -> anyhow::Result<usize>;

    /// Every classified record in insertion order.
    async fn list_all(&self) -> anyhow::Result<Vec<VideoRecord>>;

    /// Adds `record` as the newest entry. The JSON backend does not check for
    /// an existing filename; the SQLite backend drops the older record first.
    async fn append_record(&self, record: &VideoRecord) -> anyhow::Result<()>;

    /// Overwrites every record. Fails without writing if two records share a
    /// filename.
    async fn replace_all(&self, records: &[VideoRecord]) -> anyhow::Result<()>;

    /// Drops the record for `filename`. Returns whether the file existed on
    /// disk before the call, not whether a record was removed.
    async fn remove_by_filename(&self, filename: &str) -> anyhow::Result<bool>;

    /// Pending paths that have no record yet.
    async fn list_unprocessed(&self) -> anyhow::Result<Vec<String>> {
        let pending = self.list_pending().await?;
        let processed: HashSet<String> = self
            .list_all()
            .await?
            .into_iter()
            .map(|r| r.filename)
            .collect();
        Ok(pending
            .into_iter()
            .filter(|p| !processed.contains(p))
            .collect())
    }
}

/// Rejects record sets that would break the one-record-per-filename invariant.
pub(crate) fn ensure_unique_filenames(records: &[VideoRecord]) -> anyhow::Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.filename.as_str()) {
            bail!("duplicate record for {}", record.filename);
        }
    }
    Ok(())
}
