//! Moving deleted footage somewhere recoverable.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DisposalError {
    #[error("file not found: {0}")]
    Missing(PathBuf),
    #[error("system trash rejected {path}: {message}")]
    Trash { path: PathBuf, message: String },
    #[error("io error moving {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait Disposer: Send + Sync {
    fn dispose(&self, path: &Path) -> Result<(), DisposalError>;
}

/// Sends files to the platform recycle bin.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrash;

impl Disposer for SystemTrash {
    fn dispose(&self, path: &Path) -> Result<(), DisposalError> {
        if !path.exists() {
            return Err(DisposalError::Missing(path.to_path_buf()));
        }
        trash::delete(path).map_err(|e| DisposalError::Trash {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Moves files into a fixed directory, renaming on name clashes.
#[derive(Debug, Clone)]
pub struct TrashDir {
    dir: PathBuf,
}

impl TrashDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Disposer for TrashDir {
    fn dispose(&self, path: &Path) -> Result<(), DisposalError> {
        if !path.exists() {
            return Err(DisposalError::Missing(path.to_path_buf()));
        }
        let io_err = |source| DisposalError::Io {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let target = free_slot(&self.dir, path);
        // rename fails across filesystems; fall back to copy and remove.
        if fs::rename(path, &target).is_err() {
            fs::copy(path, &target).map_err(io_err)?;
            fs::remove_file(path).map_err(io_err)?;
        }
        debug!(from = %path.display(), to = %target.display(), "moved to trash dir");
        Ok(())
    }
}

fn free_slot(dir: &Path, src: &Path) -> PathBuf {
    let file_name = src
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "video".into());
    let mut candidate = dir.join(&file_name);
    if !candidate.exists() {
        return candidate;
    }
    let stem = candidate
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video")
        .to_string();
    let ext = candidate
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string();
    let mut counter = 1;
    loop {
        let name = if ext.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, ext)
        };
        candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
