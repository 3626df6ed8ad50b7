//! Port abstraction for role persistence.
use async_trait::async_trait;

use crate::domain::{Role, RoleId};

use super::StoreError;

/// Non-transactional role persistence.
///
/// `update` and `delete` report whether a row matched so callers can tell a
/// concurrent removal apart from success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Every role, oldest first.
    async fn list(&self) -> Result<Vec<Role>, StoreError>;

    /// Fetch a role by identifier.
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError>;

    /// Insert a new role.
    async fn insert(&self, role: &Role) -> Result<(), StoreError>;

    /// Replace a stored role's attributes.
    async fn update(&self, role: &Role) -> Result<bool, StoreError>;

    /// Remove a role and its user associations.
    async fn delete(&self, id: &RoleId) -> Result<bool, StoreError>;
}
