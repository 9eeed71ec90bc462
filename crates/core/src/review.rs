//! User-driven operations on classified records: browsing, re-tagging and
//! deletion.

use crate::disposal::{DisposalError, Disposer};
use crate::models::{Tag, VideoRecord};
use crate::query::{Page, VideoQuery};
use crate::registry::VideoRegistry;
use anyhow::{bail, Context};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Requesting the tag a record already has resets it to `Pending`.
pub fn toggle_tag(current: Tag, requested: Tag) -> Tag {
    if current == requested {
        Tag::Pending
    } else {
        requested
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeletionReport {
    pub trashed: Vec<String>,
    pub missing: Vec<String>,
    pub failed: Vec<String>,
    pub kept: usize,
}

impl DeletionReport {
    pub fn removed(&self) -> usize {
        self.trashed.len() + self.missing.len() + self.failed.len()
    }
}

pub struct ReviewService {
    registry: Arc<dyn VideoRegistry>,
    disposer: Arc<dyn Disposer>,
    page_size: usize,
}

impl ReviewService {
    pub fn new(registry: Arc<dyn VideoRegistry>, disposer: Arc<dyn Disposer>, page_size: usize) -> Self {
        Self {
            registry,
            disposer,
            page_size,
        }
    }

    pub async fn all(&self) -> anyhow::Result<Vec<VideoRecord>> {
        self.registry.list_all().await
    }

    pub async fn pending(&self) -> anyhow::Result<Vec<String>> {
        self.registry.list_pending().await
    }

    pub async fn unprocessed(&self) -> anyhow::Result<Vec<String>> {
        self.registry.list_unprocessed().await
    }

    pub async fn query(&self, query: &VideoQuery) -> anyhow::Result<Page<VideoRecord>> {
        let records = self.registry.list_all().await?;
        Ok(query.apply(records, self.page_size))
    }

    pub async fn save(&self, records: &[VideoRecord]) -> anyhow::Result<()> {
        self.registry.replace_all(records).await
    }

    /// Toggles `requested` on the record whose id or filename equals `key`.
    pub async fn toggle(&self, key: &str, requested: Tag) -> anyhow::Result<VideoRecord> {
        let mut records = self.registry.list_all().await?;
        let Some(record) = records
            .iter_mut()
            .find(|r| r.id == key || r.filename == key)
        else {
            bail!("no video record matches '{}'", key);
        };
        record.tag = toggle_tag(record.tag, requested);
        let updated = record.clone();
        self.registry
            .replace_all(&records)
            .await
            .context("saving retagged records")?;
        info!(filename = %updated.filename, tag = %updated.tag, "tag updated");
        Ok(updated)
    }

    /// Trashes one file and drops its record. Returns whether the file
    /// existed; a missing file still has its record pruned.
    pub async fn delete_video(&self, filename: &str) -> anyhow::Result<bool> {
        let path = Path::new(filename);
        let existed = path.exists();
        if existed {
            self.disposer
                .dispose(path)
                .with_context(|| format!("trashing {}", filename))?;
        } else {
            warn!("file does not exist: {}", filename);
        }
        self.registry
            .remove_by_filename(filename)
            .await
            .context("removing record")?;
        info!(%filename, existed, "video removed from registry");
        Ok(existed)
    }

    /// Records tagged `Delete` that a bulk deletion would remove.
    pub async fn tagged_for_deletion(&self) -> anyhow::Result<Vec<VideoRecord>> {
        Ok(self
            .registry
            .list_all()
            .await?
            .into_iter()
            .filter(|r| r.tag == Tag::Delete)
            .collect())
    }

    /// Trashes every `Delete`-tagged file and drops those records, whatever
    /// happened on disk. All other records are kept in order.
    pub async fn delete_tagged(&self) -> anyhow::Result<DeletionReport> {
        let records = self.registry.list_all().await?;
        let mut report = DeletionReport::default();
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if record.tag != Tag::Delete {
                kept.push(record);
                continue;
            }
            match self.disposer.dispose(Path::new(&record.filename)) {
                Ok(()) => report.trashed.push(record.filename),
                Err(DisposalError::Missing(_)) => {
                    warn!("file not found for deletion: {}", record.filename);
                    report.missing.push(record.filename);
                }
                Err(e) => {
                    error!("failed to trash {}: {}", record.filename, e);
                    report.failed.push(record.filename);
                }
            }
        }
        report.kept = kept.len();
        self.registry
            .replace_all(&kept)
            .await
            .context("saving registry after bulk deletion")?;
        info!(
            trashed = report.trashed.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            kept = report.kept,
            "bulk deletion finished"
        );
        Ok(report)
    }
}
