use ndarray::Array2;
use std::collections::BTreeSet;

use crate::models::{Movie, MovieId};

use super::IdIndexMap;

/// Multi-hot genre encoding of the catalog
///
/// Not consumed by either recommender; kept as a standalone feature
/// extraction step for content-based signals.
#[derive(Debug, Clone)]
pub struct GenreFeatures {
    /// Column names, `genre_<name>`, sorted by genre
    pub columns: Vec<String>,
    /// One row per movie, in `movies` id order
    pub movies: IdIndexMap,
    pub values: Array2<bool>,
}

impl GenreFeatures {
    pub fn extract(movies: &[Movie]) -> Self {
        let genres: Vec<&str> = movies
            .iter()
            .flat_map(|m| m.genres.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let index = IdIndexMap::from_ids(movies.iter().map(|m| m.id));
        let mut values = Array2::from_elem((index.len(), genres.len()), false);

        for movie in movies {
            let Some(row) = index.index_of(movie.id) else {
                continue;
            };
            for (col, genre) in genres.iter().enumerate() {
                if movie.genres.contains(*genre) {
                    values[[row, col]] = true;
                }
            }
        }

        Self {
            columns: genres.iter().map(|g| format!("genre_{}", g)).collect(),
            movies: index,
            values,
        }
    }

    /// Genre columns set for a movie
    pub fn genres_of(&self, movie_id: MovieId) -> Option<Vec<&str>> {
        let row = self.movies.index_of(movie_id)?;
        Some(
            self.columns
                .iter()
                .enumerate()
                .filter(|(col, _)| self.values[[row, *col]])
                .map(|(_, name)| name.as_str())
                .collect(),
        )
    }
}
