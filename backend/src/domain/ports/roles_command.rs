//! Driving port for role mutations.
use async_trait::async_trait;

use crate::domain::{Error, Role, RoleDraft, RoleId};

/// Role writes, each followed by cache invalidation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RolesCommand: Send + Sync {
    /// Create a role.
    async fn create_role(&self, draft: RoleDraft) -> Result<Role, Error>;

    /// Replace a role's name and level.
    async fn update_role(&self, id: &RoleId, draft: RoleDraft) -> Result<Role, Error>;

    /// Remove a role.
    async fn delete_role(&self, id: &RoleId) -> Result<(), Error>;
}
