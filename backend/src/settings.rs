//! Application settings loaded once at start-up via OrthoConfig.
//!
//! Values come from CLI flags, `APP_*` environment variables and an optional
//! config file. The resulting [`AppSettings`] is passed explicitly to the
//! server bootstrap; nothing reads configuration globally.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{AuthLevel, DEFAULT_CACHE_TTL};
use crate::outbound::security::JwtSecret;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ADMIN_AUTH_LEVEL: i32 = 2;

/// Configuration problems detected after loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("no token secret configured: set APP_JWT_SECRET or APP_APP_KEY")]
    MissingJwtSecret,
    #[error("admin_auth_level must not be negative, got {0}")]
    NegativeAdminLevel(i32),
    #[error("cannot resolve bind address {addr}: {reason}")]
    BindAddr { addr: String, reason: String },
}

#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Redis URL; the in-memory cache is used when absent.
    pub redis_url: Option<String>,
    /// HMAC secret for access tokens.
    pub jwt_secret: Option<String>,
    /// Application key used when `jwt_secret` is unset.
    pub app_key: Option<String>,
    /// Cache entry lifetime in seconds.
    pub cache_ttl_secs: Option<u64>,
    /// Minimum effective level for the admin routes.
    pub admin_auth_level: Option<i32>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("AppSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &redact(&self.database_url))
            .field("db_max_connections", &self.db_max_connections)
            .field("redis_url", &redact(&self.redis_url))
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("app_key", &redact(&self.app_key))
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("admin_auth_level", &self.admin_auth_level)
            .finish()
    }
}

impl AppSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Resolve `host:port` to the first matching socket address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the host does not resolve.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let addr = format!("{}:{}", self.host(), self.port());
        let bind_error = |reason: String| SettingsError::BindAddr {
            addr: addr.clone(),
            reason,
        };
        addr.to_socket_addrs()
            .map_err(|err| bind_error(err.to_string()))?
            .next()
            .ok_or_else(|| bind_error("no addresses".to_owned()))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map_or(DEFAULT_CACHE_TTL, Duration::from_secs)
    }

    /// Minimum level required by the admin routes.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NegativeAdminLevel`] for negative values.
    pub fn admin_auth_level(&self) -> Result<AuthLevel, SettingsError> {
        let raw = self.admin_auth_level.unwrap_or(DEFAULT_ADMIN_AUTH_LEVEL);
        AuthLevel::new(raw).map_err(|_| SettingsError::NegativeAdminLevel(raw))
    }

    /// Secret used to sign access tokens, falling back to `app_key`.
    ///
    /// A blank `jwt_secret` also falls back.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingJwtSecret`] when neither value is set
    /// to something non-blank.
    pub fn jwt_secret(&self) -> Result<JwtSecret, SettingsError> {
        self.jwt_secret
            .iter()
            .chain(self.app_key.iter())
            .find_map(|candidate| JwtSecret::new(candidate.as_str()))
            .ok_or(SettingsError::MissingJwtSecret)
    }
}
