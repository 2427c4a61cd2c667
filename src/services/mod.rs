// Service exports
pub mod cache;
pub mod postgres;
pub mod snapshot;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use postgres::{PostgresClient, PostgresError};
pub use snapshot::MatchSnapshot;
