use ndarray::{Array2, ArrayView1};
use std::collections::{HashMap, HashSet};
use xxhash_rust::xxh64::Xxh64;

use crate::models::{Movie, MovieId, Rating, UserId};

use super::IdIndexMap;

/// Dense user x item rating matrix
///
/// Unrated cells hold `0.0`. A missing rating and a literal zero rating are
/// indistinguishable here, and the user-based recommender relies on that:
/// any zero cell counts as "unseen".
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    values: Array2<f64>,
    users: IdIndexMap,
    items: IdIndexMap,
}

/// Result of a matrix build
#[derive(Debug, Clone)]
pub struct MatrixBuild {
    pub matrix: RatingMatrix,
    /// Rating rows discarded because their movie is not in the catalog
    pub dropped_ratings: usize,
}

impl RatingMatrix {
    /// Builds the matrix from raw rating and catalog records
    ///
    /// Ratings are inner-joined against the catalog by movie id. Rows with an
    /// unknown movie are dropped and counted. When the same (user, movie) pair
    /// appears more than once, the last row wins.
    pub fn build(ratings: &[Rating], movies: &[Movie]) -> MatrixBuild {
        let catalog_ids: HashSet<MovieId> = movies.iter().map(|m| m.id).collect();

        let mut cells: HashMap<(UserId, MovieId), f64> = HashMap::with_capacity(ratings.len());
        let mut dropped_ratings = 0;

        for rating in ratings {
            if !catalog_ids.contains(&rating.movie_id) {
                dropped_ratings += 1;
                continue;
            }
            cells.insert((rating.user_id, rating.movie_id), rating.rating);
        }

        let users = IdIndexMap::from_ids(cells.keys().map(|(user_id, _)| *user_id));
        let items = IdIndexMap::from_ids(cells.keys().map(|(_, movie_id)| *movie_id));

        let mut values = Array2::<f64>::zeros((users.len(), items.len()));
        for ((user_id, movie_id), rating) in &cells {
            if let (Some(row), Some(col)) = (users.index_of(*user_id), items.index_of(*movie_id)) {
                values[[row, col]] = *rating;
            }
        }

        if dropped_ratings > 0 {
            tracing::warn!(
                dropped = dropped_ratings,
                "Dropped ratings for movies missing from the catalog"
            );
        }

        tracing::debug!(
            users = users.len(),
            items = items.len(),
            ratings = cells.len(),
            "Rating matrix built"
        );

        MatrixBuild {
            matrix: Self {
                values,
                users,
                items,
            },
            dropped_ratings,
        }
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn users(&self) -> &IdIndexMap {
        &self.users
    }

    pub fn items(&self) -> &IdIndexMap {
        &self.items
    }

    /// Rating row of a user, in item order
    pub fn user_row(&self, user_id: UserId) -> Option<ArrayView1<'_, f64>> {
        self.users.index_of(user_id).map(|row| self.values.row(row))
    }

    /// Rating column of an item, in user order
    pub fn item_column(&self, movie_id: MovieId) -> Option<ArrayView1<'_, f64>> {
        self.items.index_of(movie_id).map(|col| self.values.column(col))
    }

    /// Cell value; `None` only when the user or item is outside the matrix
    pub fn get(&self, user_id: UserId, movie_id: MovieId) -> Option<f64> {
        let row = self.users.index_of(user_id)?;
        let col = self.items.index_of(movie_id)?;
        Some(self.values[[row, col]])
    }

    /// Content hash of the matrix: item ids, user ids and every cell
    ///
    /// Stored in the similarity cache header to detect stale artifacts.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh64::new(0);

        hasher.update(&(self.items.len() as u64).to_le_bytes());
        for id in self.items.ids() {
            hasher.update(&id.to_le_bytes());
        }
        hasher.update(&(self.users.len() as u64).to_le_bytes());
        for id in self.users.ids() {
            hasher.update(&id.to_le_bytes());
        }
        for value in self.values.iter() {
            hasher.update(&value.to_bits().to_le_bytes());
        }

        hasher.digest()
    }
}
