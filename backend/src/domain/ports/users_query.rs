//! Driving port for user reads.
use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Cached user reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// One user; absent users are not found.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;
}
