//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use todo_backend::domain::{AuthLevel, DEFAULT_CACHE_TTL};
use todo_backend::outbound::cache::RedisCache;
use todo_backend::outbound::persistence::DbPool;
use todo_backend::outbound::security::JwtSecret;

/// Builder-style configuration for creating the HTTP server.
///
/// Without a database pool or Redis cache the server falls back to the
/// in-memory adapters, which suits local development only.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: JwtSecret,
    pub(crate) admin_level: AuthLevel,
    pub(crate) cache_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) redis: Option<RedisCache>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: JwtSecret, admin_level: AuthLevel) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            admin_level,
            cache_ttl: DEFAULT_CACHE_TTL,
            db_pool: None,
            redis: None,
        }
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Back the stores with PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Back the cache with Redis.
    #[must_use]
    pub fn with_redis(mut self, cache: RedisCache) -> Self {
        self.redis = Some(cache);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
