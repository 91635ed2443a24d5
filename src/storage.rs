//! HTML snapshot storage.
//!
//! Every scrape that reaches a page body writes it to disk so selectors can
//! be debugged and re-run offline. One file per call, named by the call's
//! snapshot id: `{snapshots_dir}/{id}.html`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create snapshot directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Persists raw page bodies.
pub trait SnapshotStore: Send + Sync {
    /// Write `content` under `identifier` and return where it went.
    fn save(&self, content: &str, identifier: &str) -> Result<PathBuf, StorageError>;
}

/// Snapshot store backed by a directory.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Storage path for `identifier`: `{dir}/{identifier}.html`.
    pub fn snapshot_path(&self, identifier: &str) -> Result<PathBuf, StorageError> {
        let name = sanitize_identifier(identifier)
            .ok_or_else(|| StorageError::InvalidIdentifier(identifier.to_string()))?;
        Ok(self.dir.join(format!("{}.html", name)))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn save(&self, content: &str, identifier: &str) -> Result<PathBuf, StorageError> {
        let path = self.snapshot_path(identifier)?;

        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, content).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        debug!("Saved HTML snapshot: {}", path.display());
        Ok(path)
    }
}

/// Keep identifiers to a single safe path component.
fn sanitize_identifier(identifier: &str) -> Option<String> {
    let name: String = identifier
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.trim_matches('_').is_empty() {
        None
    } else {
        Some(name)
    }
}
