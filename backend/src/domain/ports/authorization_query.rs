//! Driving port for role-based authorization checks.
use async_trait::async_trait;

use crate::domain::{AuthLevel, Error, UserId};

/// Resolves a user's effective authorization level.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorizationQuery: Send + Sync {
    /// Maximum level over the user's roles, or [`AuthLevel::NONE`].
    async fn effective_auth_level(&self, user: &UserId) -> Result<AuthLevel, Error>;
}
