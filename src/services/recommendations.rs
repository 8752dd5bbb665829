use std::sync::Arc;
use std::time::Instant;

use crate::{
    db::{MovieCatalog, RatingLog},
    error::{AppError, AppResult},
    models::{Catalog, ItemRecommendation, Movie, MovieId, Rating, UserId, UserRecommendation},
};

use super::{item_based, user_based, MatrixBuild, RatingMatrix, SimilarityCache};

/// Entry point used by the HTTP layer
///
/// Every call reads the catalog and rating log afresh and rebuilds the rating
/// matrix; only the item similarity is persisted between calls.
#[derive(Clone)]
pub struct RecommendationService {
    catalog: Arc<dyn MovieCatalog>,
    ratings: Arc<dyn RatingLog>,
    item_similarity: SimilarityCache,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        ratings: Arc<dyn RatingLog>,
        item_similarity: SimilarityCache,
    ) -> Self {
        Self {
            catalog,
            ratings,
            item_similarity,
        }
    }

    /// Movies for `user_id` based on what similar users rated highly
    pub async fn recommend_for_user(
        &self,
        user_id: UserId,
        n: usize,
        k: usize,
    ) -> AppResult<Vec<UserRecommendation>> {
        let start = Instant::now();
        let (movies, ratings) = self.load_data().await?;
        let matrix = build_matrix(&ratings, &movies);

        let scored = user_based::recommend_for_user(&matrix, user_id, n, k)?;

        let catalog = Catalog::new(movies);
        let recommendations = scored
            .into_iter()
            .map(|item| {
                let title = catalog.title(item.movie_id).ok_or_else(|| {
                    AppError::Internal(format!("Movie {} missing from catalog", item.movie_id))
                })?;
                Ok(UserRecommendation {
                    rank: item.rank,
                    title: title.to_string(),
                    score: item.score,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!(
            user_id,
            n,
            k,
            returned = recommendations.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "User-based recommendations computed"
        );

        Ok(recommendations)
    }

    /// Movies whose rating pattern is closest to `movie_id`
    pub async fn recommend_for_item(
        &self,
        movie_id: MovieId,
        n: usize,
    ) -> AppResult<Vec<ItemRecommendation>> {
        let start = Instant::now();
        let (movies, ratings) = self.load_data().await?;
        let matrix = build_matrix(&ratings, &movies);

        // Unknown ids fail before touching the cache
        if matrix.items().index_of(movie_id).is_none() {
            return Err(AppError::ItemNotFound(movie_id));
        }

        let similarity = self.item_similarity.get_or_compute(&matrix).await?;
        let catalog = Catalog::new(movies);
        let recommendations =
            item_based::recommend_for_item(&similarity, matrix.items(), &catalog, movie_id, n)?;

        tracing::info!(
            movie_id,
            n,
            returned = recommendations.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Item-based recommendations computed"
        );

        Ok(recommendations)
    }

    /// Recomputes and stores the item similarity; returns the item count
    pub async fn rebuild_item_similarity(&self) -> AppResult<usize> {
        let (movies, ratings) = self.load_data().await?;
        let matrix = build_matrix(&ratings, &movies);

        let similarity = self.item_similarity.rebuild(&matrix).await?;
        Ok(similarity.len())
    }

    /// Drops the stored item similarity
    pub async fn invalidate_item_similarity(&self) -> AppResult<()> {
        self.item_similarity.invalidate().await
    }

    async fn load_data(&self) -> AppResult<(Vec<Movie>, Vec<Rating>)> {
        let (movies, ratings) = tokio::try_join!(self.catalog.list_all(), self.ratings.list_all())?;

        tracing::debug!(
            movies = movies.len(),
            ratings = ratings.len(),
            "Loaded catalog and ratings"
        );

        Ok((movies, ratings))
    }
}

fn build_matrix(ratings: &[Rating], movies: &[Movie]) -> RatingMatrix {
    // Dropped ratings are already logged by the builder
    let MatrixBuild { matrix, .. } = RatingMatrix::build(ratings, movies);
    matrix
}
