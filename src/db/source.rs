use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{Movie, Rating},
};

/// Source of the movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Every movie in the catalog
    async fn list_all(&self) -> AppResult<Vec<Movie>>;
}

/// Source of user ratings
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingLog: Send + Sync {
    /// Every rating row, in source order
    async fn list_all(&self) -> AppResult<Vec<Rating>>;
}

/// Catalog and rating log held in memory
#[derive(Default)]
pub struct InMemoryDataSource {
    movies: RwLock<Vec<Movie>>,
    ratings: RwLock<Vec<Rating>>,
}

impl InMemoryDataSource {
    pub fn new(movies: Vec<Movie>, ratings: Vec<Rating>) -> Self {
        Self {
            movies: RwLock::new(movies),
            ratings: RwLock::new(ratings),
        }
    }

    pub async fn replace_ratings(&self, ratings: Vec<Rating>) {
        *self.ratings.write().await = ratings;
    }

    pub async fn add_rating(&self, rating: Rating) {
        self.ratings.write().await.push(rating);
    }
}

#[async_trait::async_trait]
impl MovieCatalog for InMemoryDataSource {
    async fn list_all(&self) -> AppResult<Vec<Movie>> {
        Ok(self.movies.read().await.clone())
    }
}

#[async_trait::async_trait]
impl RatingLog for InMemoryDataSource {
    async fn list_all(&self) -> AppResult<Vec<Rating>> {
        Ok(self.ratings.read().await.clone())
    }
}
