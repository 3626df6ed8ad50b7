//! Cache adapters implementing the [`Cache`](crate::domain::ports::Cache)
//! port.
//!
//! - [`RedisCache`] stores entries in Redis through a `bb8` connection pool.
//! - [`InMemoryCache`] keeps entries in process memory, for local runs and
//!   tests without a Redis server.

mod memory_cache;
mod redis_cache;

pub use memory_cache::InMemoryCache;
pub use redis_cache::{RedisCache, RedisCacheError};
