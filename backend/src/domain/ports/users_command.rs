//! Driving port for user mutations.
use async_trait::async_trait;

use crate::domain::{ChangeRoleRequest, Error, NewUser, User, UserChanges, UserId};

/// User writes, each followed by cache invalidation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register or create a user, hashing their password.
    async fn create_user(&self, request: NewUser) -> Result<User, Error>;

    /// Apply a partial update; a new password is re-hashed.
    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Remove a user.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;

    /// Attach and detach roles atomically.
    async fn change_roles(&self, request: ChangeRoleRequest) -> Result<(), Error>;
}
