use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::core::location::LocationIndex;
use crate::models::{CacheStatus, LocationTables};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Loader error: {0}")]
    Loader(String),
}

/// Multi-tier cache for location reference data
///
/// L1 is an in-process moka cache holding the built index. L2 is an
/// optional Redis copy of the raw tables, shared across instances. Officer
/// and intention data are never cached, so nothing needs invalidating on
/// profile writes; the TTL bounds how stale reference data can get.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Arc<LocationIndex>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        })
    }

    /// Create a process-local cache manager with no L2 tier
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        }
    }

    pub fn has_l2(&self) -> bool {
        self.redis.is_some()
    }

    /// Get the location index, loading it on a miss in both tiers
    ///
    /// Concurrent misses share one load.
    pub async fn location_index<F, Fut, E>(&self, loader: F) -> Result<Arc<LocationIndex>, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<LocationTables, E>>,
        E: std::fmt::Display,
    {
        let key = CacheKey::location_tables();

        self.l1_cache
            .try_get_with(key.clone(), async {
                if let Some(tables) = self.get_l2::<LocationTables>(&key).await {
                    tracing::trace!("L2 cache hit: {}", key);
                    return Ok(Arc::new(LocationIndex::from_tables(tables)));
                }

                tracing::debug!("Cache miss: {}, loading reference data", key);
                let tables = loader().await.map_err(|e| CacheError::Loader(e.to_string()))?;
                self.set_l2(&key, &tables).await;

                Ok::<_, CacheError>(Arc::new(LocationIndex::from_tables(tables)))
            })
            .await
            .map_err(|e: Arc<CacheError>| match e.as_ref() {
                CacheError::Loader(message) => CacheError::Loader(message.clone()),
                other => CacheError::Loader(other.to_string()),
            })
    }

    /// Drop cached reference data from both tiers
    pub async fn invalidate_locations(&self) -> Result<(), CacheError> {
        let key = CacheKey::location_tables();
        self.l1_cache.invalidate(&key).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            redis::cmd("DEL")
                .arg(&key)
                .query_async::<()>(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// L2 read; any failure degrades to a miss
    async fn get_l2<T>(&self, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let redis = self.redis.as_ref()?;
        let mut conn = redis.lock().await;
        let value: Result<Option<String>, _> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await;
        drop(conn);

        match value {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Discarding undecodable L2 entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("L2 cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// L2 write with TTL; failures are logged and ignored
    async fn set_l2<T>(&self, key: &str, value: &T)
    where
        T: Serialize,
    {
        let Some(redis) = &self.redis else {
            return;
        };

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize {} for L2: {}", key, e);
                return;
            }
        };

        let mut conn = redis.lock().await;
        let result = redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await;

        match result {
            Ok(()) => tracing::trace!("Cache set: {}", key),
            Err(e) => tracing::warn!("L2 cache write failed for {}: {}", key, e),
        }
    }

    /// Cache state reported by the health endpoint
    pub async fn stats(&self) -> CacheStatus {
        // entry_count lags until pending maintenance has run
        self.l1_cache.run_pending_tasks().await;
        CacheStatus {
            l1_entries: self.l1_cache.entry_count(),
            l2_enabled: self.has_l2(),
            ttl_secs: self.ttl_secs,
        }
    }
}

fn build_l1(l1_size: u64, ttl_secs: u64) -> moka::future::Cache<String, Arc<LocationIndex>> {
    moka::future::CacheBuilder::new(l1_size)
        .time_to_live(Duration::from_secs(ttl_secs))
        .build()
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Units, municipalities and states, stored together
    pub fn location_tables() -> String {
        "locations:tables:v1".to_string()
    }
}
