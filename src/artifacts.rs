//! Artifact store: generated audio clips as flat files in one directory.
//!
//! The directory listing is the only inventory. Nothing tracks which clips are
//! still referenced by a returned outcome, so a read may find the file gone
//! after a janitor sweep; that surfaces as `ArtifactError::NotFound`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSION: &str = "mp3";

/// Opaque handle to a stored artifact (its file name inside the store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A ref is only a bare file name; anything that could escape the store is rejected.
    fn is_safe(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('.')
            && !self.0.contains(['/', '\\', '\0'])
            && !self.0.contains("..")
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    NotFound(ArtifactRef),

    #[error("artifact store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Directory-backed store for audio artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the artifact directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), ArtifactError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ArtifactError::io(&self.dir, e))
    }

    /// Write `bytes` to a new artifact whose name starts with `stem`.
    ///
    /// A timestamp and random suffix are appended, so concurrent submissions
    /// saving the same stem never overwrite each other.
    pub async fn save(&self, stem: &str, bytes: &[u8]) -> Result<ArtifactRef, ArtifactError> {
        self.ensure_dir().await?;

        let artifact = ArtifactRef(unique_file_name(stem));
        let path = self.dir.join(artifact.as_str());

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ArtifactError::io(&path, e))?;

        debug!(artifact = %artifact, size = bytes.len(), "Artifact saved");
        Ok(artifact)
    }

    /// Read an artifact's bytes.
    pub async fn read(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, ArtifactError> {
        if !artifact.is_safe() {
            return Err(ArtifactError::NotFound(artifact.clone()));
        }

        let path = self.dir.join(artifact.as_str());
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ArtifactError::NotFound(artifact.clone()))
            }
            Err(e) => Err(ArtifactError::io(&path, e)),
        }
    }

    /// List every entry in the store, sorted by name.
    ///
    /// A missing directory is an empty store.
    pub async fn list_all(&self) -> Result<Vec<ArtifactRef>, ArtifactError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ArtifactError::io(&self.dir, e)),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ArtifactError::io(&self.dir, e))?
        {
            if let Some(name) = entry.file_name().to_str() {
                let artifact = ArtifactRef::new(name);
                if artifact.is_safe() {
                    artifacts.push(artifact);
                }
            }
        }

        artifacts.sort();
        Ok(artifacts)
    }

    /// Delete one artifact.
    pub async fn delete(&self, artifact: &ArtifactRef) -> Result<(), ArtifactError> {
        if !artifact.is_safe() {
            return Err(ArtifactError::NotFound(artifact.clone()));
        }

        let path = self.dir.join(artifact.as_str());
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ArtifactError::NotFound(artifact.clone()))
            }
            Err(e) => Err(ArtifactError::io(&path, e)),
        }
    }
}

fn unique_file_name(stem: &str) -> String {
    let stem = if stem.is_empty() { "clip" } else { stem };
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}.{}",
        stem,
        Utc::now().format("%Y%m%d%H%M%S"),
        &suffix[..8],
        EXTENSION
    )
}
