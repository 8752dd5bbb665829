use std::sync::Arc;

use crate::{
    db::SimilarityStore,
    error::{AppError, AppResult},
};

use super::{cosine_similarity, RatingMatrix, SimilarityArtifact, SimilarityMatrix};

/// Persisted item x item similarity matrix
///
/// A stored artifact is only served when its header matches the current
/// matrix: same item count, same item id order and same dataset fingerprint.
/// Anything else is reported as `StaleCacheMismatch`; call [`rebuild`] or
/// [`invalidate`] to recover.
///
/// [`rebuild`]: SimilarityCache::rebuild
/// [`invalidate`]: SimilarityCache::invalidate
#[derive(Clone)]
pub struct SimilarityCache {
    store: Arc<dyn SimilarityStore>,
}

impl SimilarityCache {
    pub fn new(store: Arc<dyn SimilarityStore>) -> Self {
        Self { store }
    }

    /// Loads the stored matrix, or computes and stores it on a miss
    pub async fn get_or_compute(&self, matrix: &RatingMatrix) -> AppResult<SimilarityMatrix> {
        match self.store.load().await? {
            Some(raw) => {
                let artifact = SimilarityArtifact::decode(&raw)?;
                check_fresh(&artifact, matrix)?;
                tracing::debug!(
                    backend = self.store.name(),
                    items = artifact.item_ids.len(),
                    "Item similarity cache hit"
                );
                Ok(artifact.similarity)
            }
            None => {
                tracing::info!(backend = self.store.name(), "Item similarity cache miss");
                self.rebuild(matrix).await
            }
        }
    }

    /// Computes the item similarity for `matrix` and replaces the stored copy
    pub async fn rebuild(&self, matrix: &RatingMatrix) -> AppResult<SimilarityMatrix> {
        let start = std::time::Instant::now();
        let similarity = cosine_similarity(matrix.values().t());

        let artifact = SimilarityArtifact {
            dataset_fingerprint: matrix.fingerprint(),
            item_ids: matrix.items().ids().to_vec(),
            similarity,
        };
        self.store.save(&artifact.encode()).await?;

        tracing::info!(
            backend = self.store.name(),
            items = artifact.item_ids.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Item similarity computed and stored"
        );

        Ok(artifact.similarity)
    }

    /// Drops the stored copy so the next lookup recomputes it
    pub async fn invalidate(&self) -> AppResult<()> {
        self.store.remove().await?;
        tracing::info!(backend = self.store.name(), "Item similarity cache invalidated");
        Ok(())
    }
}

fn check_fresh(artifact: &SimilarityArtifact, matrix: &RatingMatrix) -> AppResult<()> {
    let current_items = matrix.items().ids();

    let mismatch = if artifact.item_ids.len() != current_items.len() {
        Some(format!(
            "stored for {} items, current data has {}",
            artifact.item_ids.len(),
            current_items.len()
        ))
    } else if artifact.item_ids != current_items {
        Some("item order differs from current data".to_string())
    } else if artifact.dataset_fingerprint != matrix.fingerprint() {
        Some(format!(
            "dataset fingerprint {:016x} does not match current {:016x}",
            artifact.dataset_fingerprint,
            matrix.fingerprint()
        ))
    } else {
        None
    };

    match mismatch {
        Some(reason) => {
            tracing::warn!(reason = %reason, "Stale item similarity cache");
            Err(AppError::StaleCacheMismatch(reason))
        }
        None => Ok(()),
    }
}
