//! Redis-backed cache adapter.
//!
//! Entries are written with `SETEX` so Redis enforces the TTL. Read failures
//! are logged and reported as misses; write and delete failures surface as
//! [`CacheError::Backend`].

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{self, RedisError};
use tracing::{debug, warn};

use crate::domain::ports::{Cache, CacheError, CacheKey};

/// Errors raised while building the Redis pool.
#[derive(Debug, thiserror::Error)]
pub enum RedisCacheError {
    /// The connection URL could not be parsed.
    #[error("invalid redis url: {0}")]
    InvalidUrl(#[source] RedisError),
    /// The pool could not open its initial connections.
    #[error("failed to build redis pool: {0}")]
    Build(#[source] RedisError),
}

/// [`Cache`] adapter over a pooled Redis connection.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisCache {
    /// Connect to `url` with at most `max_size` pooled connections.
    ///
    /// # Errors
    ///
    /// Returns [`RedisCacheError`] when the URL is malformed or the server
    /// cannot be reached.
    pub async fn connect(url: &str, max_size: u32) -> Result<Self, RedisCacheError> {
        let manager = RedisConnectionManager::new(url).map_err(RedisCacheError::InvalidUrl)?;
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .await
            .map_err(RedisCacheError::Build)?;
        debug!(max_size, "redis cache pool ready");
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, CacheError> {
        self.pool.get().await.map_err(map_run_error)
    }
}

fn map_run_error(error: RunError<RedisError>) -> CacheError {
    match error {
        RunError::User(error) => CacheError::backend(error.to_string()),
        RunError::TimedOut => CacheError::backend("timed out waiting for a redis connection"),
    }
}

fn map_redis_error(operation: &'static str) -> impl FnOnce(RedisError) -> CacheError {
    move |error| CacheError::backend(format!("redis {operation} failed: {error}"))
}

#[async_trait]
impl Cache for RedisCache {
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.connection().await?;
        redis::cmd("SETEX")
            .arg(key.as_str())
            .arg(ttl_secs)
            .arg(value)
            .query_async::<()>(&mut *conn)
            .await
            .map_err(map_redis_error("SETEX"))?;
        debug!(key = %key, ttl_secs, "cache set");
        Ok(())
    }

    async fn get(&self, key: &CacheKey) -> Option<String> {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(error) => {
                warn!(key = %key, %error, "redis unavailable; treating read as a miss");
                return None;
            }
        };
        match redis::cmd("GET")
            .arg(key.as_str())
            .query_async::<Option<String>>(&mut *conn)
            .await
        {
            Ok(value) => value,
            Err(error) => {
                warn!(key = %key, %error, "redis GET failed; treating read as a miss");
                None
            }
        }
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(key.as_str())
            .query_async::<()>(&mut *conn)
            .await
            .map_err(map_redis_error("DEL"))?;
        debug!(key = %key, "cache delete");
        Ok(())
    }
}
