use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

mod recommendation;

pub use recommendation::{ItemRecommendation, ScoredItem, UserRecommendation};

/// External movie identifier, as stored in the catalog
pub type MovieId = i64;

/// External user identifier, as stored in the rating log
pub type UserId = i64;

/// A movie from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub genres: BTreeSet<String>,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>, genres: &[&str]) -> Self {
        Self {
            id,
            title: title.into(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    /// Parses a `|`-separated genre column (MovieLens convention)
    ///
    /// Empty segments are skipped, so `""` yields an empty set.
    pub fn parse_genres(raw: &str) -> BTreeSet<String> {
        raw.split('|')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A single rating row from the rating log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f64) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}

/// Movies indexed by id for title lookups
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: HashMap<MovieId, Movie>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies: movies.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    pub fn title(&self, id: MovieId) -> Option<&str> {
        self.get(id).map(|m| m.title.as_str())
    }
}
