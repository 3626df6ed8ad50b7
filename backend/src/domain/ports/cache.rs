//! Port abstraction for the side cache holding serialised projections.
use std::time::Duration;

use async_trait::async_trait;

use super::{CacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by cache adapters on writes and deletes.
    pub enum CacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "cache backend failure: {message}",
    }
}

/// Key-value cache with per-entry expiry.
///
/// The cache is never authoritative. `get` collapses a miss and a backend
/// failure into `None`; adapters log the failure before reporting the miss.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Read the value stored under `key`.
    async fn get(&self, key: &CacheKey) -> Option<String>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError>;
}
