//! In-process cache adapter.
//!
//! Entries expire lazily: an expired entry is dropped on the next `get` for
//! its key. Time comes from the injected clock so expiry can be driven in
//! tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{Cache, CacheError, CacheKey};

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// [`Cache`] adapter holding entries in a process-local map.
#[derive(Clone)]
pub struct InMemoryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic mid-insert leaves the map consistent; keep serving it.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|_| CacheError::backend(format!("ttl out of range for {key}")))?;
        let expires_at = self.clock.utc() + ttl;
        self.lock().insert(
            key.as_str().to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &CacheKey) -> Option<String> {
        let now = self.clock.utc();
        let mut entries = self.lock();
        match entries.get(key.as_str()) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key.as_str());
                None
            }
            None => None,
        }
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.lock().remove(key.as_str());
        Ok(())
    }
}
