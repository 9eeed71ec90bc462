//! Whole-document JSON persistence.
//!
//! Documents are read in full and written back in full on every mutation.
//! There is no locking; the last writer wins.

use crate::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Reads a document, returning `Ok(None)` when the file does not exist.
pub async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let raw = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads a document, treating a missing, unreadable or malformed file as empty.
///
/// Malformed contents are not preserved: the next write replaces them.
pub async fn read_document_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_document(path).await {
        Ok(Some(value)) => value,
        Ok(None) => {
            debug!(path = %path.display(), "document absent, starting empty");
            T::default()
        }
        Err(e) => {
            warn!("failed to read {}, treating as empty: {}", path.display(), e);
            T::default()
        }
    }
}

/// Serializes `value` with two-space indentation and overwrites `path`.
pub async fn write_document<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    let body = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
}
