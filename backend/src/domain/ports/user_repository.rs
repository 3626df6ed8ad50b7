//! Port abstraction for user persistence.
use async_trait::async_trait;

use crate::domain::{AuthLevel, Email, PasswordHash, TodoId, User, UserCredentials, UserId};

use super::StoreError;

/// Non-transactional user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every user, oldest first.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Fetch a user and their password hash by email.
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, StoreError>;

    /// Insert a new user. A duplicate email yields [`StoreError::Conflict`].
    async fn insert(&self, user: &User, password_hash: &PasswordHash) -> Result<(), StoreError>;

    /// Replace a stored user's attributes, and the hash when one is supplied.
    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, StoreError>;

    /// Identifiers of the todos owned by the user.
    async fn todo_ids(&self, id: &UserId) -> Result<Vec<TodoId>, StoreError>;

    /// Remove a user with their todos and role associations.
    async fn delete(&self, id: &UserId) -> Result<bool, StoreError>;

    /// Highest authorization level among the user's roles, if any.
    async fn max_auth_level(&self, id: &UserId) -> Result<Option<AuthLevel>, StoreError>;
}
