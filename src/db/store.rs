use std::path::{Path, PathBuf};

use crate::error::AppResult;

/// Storage for the encoded item similarity artifact
///
/// Implementations hold a single artifact at a fixed location. Writers must
/// replace it atomically so a concurrent reader sees either the old or the
/// new artifact, never a partial one.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SimilarityStore: Send + Sync {
    /// Returns the stored bytes, or `None` when nothing has been persisted
    async fn load(&self) -> AppResult<Option<Vec<u8>>>;

    /// Replaces the stored artifact
    async fn save(&self, bytes: &[u8]) -> AppResult<()>;

    /// Deletes the stored artifact; a missing artifact is not an error
    async fn remove(&self) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Artifact stored as a single file
pub struct FileSimilarityStore {
    path: PathBuf,
}

impl FileSimilarityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unique sibling of the target, one per save
    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        PathBuf::from(tmp)
    }
}

#[async_trait::async_trait]
impl SimilarityStore for FileSimilarityStore {
    async fn load(&self) -> AppResult<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, bytes: &[u8]) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write beside the target, then rename over it
        let tmp = self.temp_path();
        let written = match tokio::fs::write(&tmp, bytes).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "Similarity artifact written");
        Ok(())
    }

    async fn remove(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
