//! Read-through caching and write invalidation shared by the entity services.
//!
//! Reads consult the cache first and fall back to the store, writing the
//! serialised result back with a fixed TTL. Writes delete every key that may
//! now be stale, one at a time, stopping at the first failure.
//!
//! There is no locking between the two halves: a read racing a write can
//! repopulate a key after the write invalidated it. The entry then stays
//! stale until its TTL expires.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::Error;
use super::port_error_mapping::map_cache_error;
use super::ports::{Cache, CacheKey};

/// Default lifetime of a cache entry.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache-aside helper wrapping a [`Cache`] and the entry TTL.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CacheAside {
    /// Create a helper writing entries with the given TTL.
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Return the cached value for `key`, or load, cache and return it.
    ///
    /// A cached payload that fails to deserialise is an internal error, not a
    /// miss. A failed cache write fails the read even though `load`
    /// succeeded.
    pub async fn read_through<T, F, Fut>(&self, key: &CacheKey, load: F) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if let Some(payload) = self.cache.get(key).await.filter(|p| !p.is_empty()) {
            debug!(key = %key, "cache hit");
            return serde_json::from_str(&payload).map_err(|error| {
                warn!(key = %key, %error, "cached payload failed to deserialise");
                Error::internal(format!("corrupt cache entry for {key}"))
            });
        }

        debug!(key = %key, "cache miss");
        let value = load().await?;
        let payload = serde_json::to_string(&value)
            .map_err(|error| Error::internal(format!("failed to serialise {key}: {error}")))?;
        self.cache
            .set(key, &payload, self.ttl)
            .await
            .map_err(map_cache_error)?;
        Ok(value)
    }

    /// Delete each key in order, stopping at the first failure.
    pub async fn invalidate(&self, keys: &[CacheKey]) -> Result<(), Error> {
        for key in keys {
            self.cache.delete(key).await.map_err(|error| {
                warn!(key = %key, %error, "cache invalidation failed");
                map_cache_error(error)
            })?;
        }
        Ok(())
    }
}
