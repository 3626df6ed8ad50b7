//! Port abstraction for transactional role assignment.
//!
//! A [`UserRoleTransaction`] owns one store connection for its whole life.
//! Nothing it writes is visible to other callers until `commit`; dropping it
//! without committing discards every change.

use async_trait::async_trait;

use crate::domain::{Role, RoleId, User, UserId};

use super::StoreError;

/// Factory for role-assignment transactions.
#[async_trait]
pub trait UserRoleStore: Send + Sync {
    /// Open a transaction on a dedicated connection.
    async fn begin(&self) -> Result<Box<dyn UserRoleTransaction>, StoreError>;
}

/// Reads and association writes sharing one transactional handle.
#[async_trait]
pub trait UserRoleTransaction: Send {
    /// Fetch a user inside the transaction.
    async fn find_user(&mut self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Fetch a role inside the transaction.
    async fn find_role(&mut self, id: &RoleId) -> Result<Option<Role>, StoreError>;

    /// Associate every role with the user; existing associations are kept.
    async fn attach_roles(&mut self, user: &UserId, roles: &[RoleId]) -> Result<(), StoreError>;

    /// Remove the association between the user and every listed role.
    async fn detach_roles(&mut self, user: &UserId, roles: &[RoleId]) -> Result<(), StoreError>;

    /// Make every write visible.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discard every write.
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
