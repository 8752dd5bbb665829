//! Recommendation engine
//!
//! The matrix, similarity and recommender modules are synchronous and pure;
//! `similarity_cache` and `recommendations` add persistence and data loading.

pub mod artifact;
pub mod features;
pub mod index_map;
pub mod item_based;
pub mod matrix;
pub mod recommendations;
pub mod similarity;
pub mod similarity_cache;
pub mod user_based;

pub use artifact::SimilarityArtifact;
pub use features::GenreFeatures;
pub use index_map::IdIndexMap;
pub use matrix::{MatrixBuild, RatingMatrix};
pub use recommendations::RecommendationService;
pub use similarity::{cosine_similarity, SimilarityMatrix};
pub use similarity_cache::SimilarityCache;
