use super::{ensure_unique_filenames, VideoRegistry};
use crate::intake::{merge_unique, VideoFilter};
use crate::models::VideoRecord;
use anyhow::Context;
use std::path::{Path, PathBuf};
use storage::json::{read_document_or_default, write_document};
use tracing::debug;

/// Flat-file registry: one JSON array of paths and one JSON array of records,
/// each rewritten in full on every mutation.
#[derive(Debug, Clone)]
pub struct JsonRegistry {
    pending_path: PathBuf,
    registry_path: PathBuf,
    filter: VideoFilter,
}

impl JsonRegistry {
    pub fn new(pending_path: impl Into<PathBuf>, registry_path: impl Into<PathBuf>, filter: VideoFilter) -> Self {
        Self {
            pending_path: pending_path.into(),
            registry_path: registry_path.into(),
            filter,
        }
    }

    pub fn pending_path(&self) -> &Path {
        &self.pending_path
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    async fn write_records(&self, records: &[VideoRecord]) -> anyhow::Result<()> {
        write_document(&self.registry_path, records)
            .await
            .with_context(|| format!("writing {}", self.registry_path.display()))
    }
}

#[async_trait::async_trait]
impl VideoRegistry for JsonRegistry {
    async fn list_pending(&self) -> anyhow::Result<Vec<String>> {
        let stored: Vec<String> = read_document_or_default(&self.pending_path).await;
        let mut pending = Vec::with_capacity(stored.len());
        merge_unique(&mut pending, stored);
        Ok(pending)
    }

    async fn append_pending(&self, paths: &[String]) -> anyhow::Result<usize> {
        let mut stored: Vec<String> = read_document_or_default(&self.pending_path).await;
        let videos = paths.iter().filter(|p| self.filter.is_video(p)).cloned();
        let added = merge_unique(&mut stored, videos);
        write_document(&self.pending_path, &stored)
            .await
            .with_context(|| format!("writing {}", self.pending_path.display()))?;
        debug!(added, total = stored.len(), "pending paths stored");
        Ok(added)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<VideoRecord>> {
        Ok(read_document_or_default(&self.registry_path).await)
    }

    async fn append_record(&self, record: &VideoRecord) -> anyhow::Result<()> {
        let mut records: Vec<VideoRecord> = read_document_or_default(&self.registry_path).await;
        records.push(record.clone());
        self.write_records(&records).await
    }

    async fn replace_all(&self, records: &[VideoRecord]) -> anyhow::Result<()> {
        ensure_unique_filenames(records)?;
        self.write_records(records).await
    }

    async fn remove_by_filename(&self, filename: &str) -> anyhow::Result<bool> {
        let existed = Path::new(filename).exists();
        let mut records: Vec<VideoRecord> = read_document_or_default(&self.registry_path).await;
        let before = records.len();
        records.retain(|r| r.filename != filename);
        if records.len() != before {
            self.write_records(&records).await?;
        }
        Ok(existed)
    }
}
