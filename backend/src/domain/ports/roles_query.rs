//! Driving port for role reads.
use async_trait::async_trait;

use crate::domain::{Error, Role, RoleId};

/// Cached role reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RolesQuery: Send + Sync {
    /// Every role.
    async fn list_roles(&self) -> Result<Vec<Role>, Error>;

    /// One role; absent roles are not found.
    async fn get_role(&self, id: &RoleId) -> Result<Role, Error>;
}
