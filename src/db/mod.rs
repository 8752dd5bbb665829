pub mod postgres;
pub mod redis;
pub mod source;
pub mod store;

pub use postgres::{create_pool, PgDataSource};
pub use self::redis::{create_redis_client, RedisSimilarityStore};
pub use source::{InMemoryDataSource, MovieCatalog, RatingLog};
pub use store::{FileSimilarityStore, SimilarityStore};

#[cfg(test)]
pub use source::{MockMovieCatalog, MockRatingLog};
#[cfg(test)]
pub use store::MockSimilarityStore;
