//! Role domain service.
//!
//! Implements the role driving ports on top of a [`RoleRepository`], caching
//! reads under `roles:<id>` and `roles:all`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use super::cache_aside::CacheAside;
use super::port_error_mapping::map_store_error;
use super::ports::{CacheKey, CacheNamespace, RoleRepository, RolesCommand, RolesQuery};
use super::{Error, Role, RoleDraft, RoleId};

/// Role service implementing [`RolesQuery`] and [`RolesCommand`].
#[derive(Clone)]
pub struct RoleService<R> {
    roles: Arc<R>,
    cache: CacheAside,
    clock: Arc<dyn Clock>,
}

impl<R> RoleService<R> {
    /// Create a new service over the given repository and cache.
    pub fn new(roles: Arc<R>, cache: CacheAside, clock: Arc<dyn Clock>) -> Self {
        Self {
            roles,
            cache,
            clock,
        }
    }

    fn role_key(id: &RoleId) -> CacheKey {
        CacheKey::entity(CacheNamespace::Roles, id)
    }

    fn all_key() -> CacheKey {
        CacheKey::collection(CacheNamespace::Roles)
    }
}

impl<R> RoleService<R>
where
    R: RoleRepository,
{
    async fn load_role(&self, id: &RoleId) -> Result<Role, Error> {
        self.roles
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("role not found"))
    }
}

#[async_trait]
impl<R> RolesQuery for RoleService<R>
where
    R: RoleRepository,
{
    async fn list_roles(&self) -> Result<Vec<Role>, Error> {
        self.cache
            .read_through(&Self::all_key(), || async {
                self.roles.list().await.map_err(map_store_error)
            })
            .await
    }

    async fn get_role(&self, id: &RoleId) -> Result<Role, Error> {
        self.cache
            .read_through(&Self::role_key(id), || self.load_role(id))
            .await
    }
}

#[async_trait]
impl<R> RolesCommand for RoleService<R>
where
    R: RoleRepository,
{
    async fn create_role(&self, draft: RoleDraft) -> Result<Role, Error> {
        let now = self.clock.utc();
        let role = Role {
            id: RoleId::generate(),
            name: draft.name,
            auth_level: draft.auth_level,
            created_at: now,
            updated_at: now,
        };
        self.roles.insert(&role).await.map_err(map_store_error)?;
        self.cache.invalidate(&[Self::all_key()]).await?;
        Ok(role)
    }

    async fn update_role(&self, id: &RoleId, draft: RoleDraft) -> Result<Role, Error> {
        let mut role = self.load_role(id).await?;
        role.name = draft.name;
        role.auth_level = draft.auth_level;
        role.updated_at = self.clock.utc();

        if !self.roles.update(&role).await.map_err(map_store_error)? {
            return Err(Error::not_found("role not found"));
        }
        self.cache
            .invalidate(&[Self::role_key(id), Self::all_key()])
            .await?;
        Ok(role)
    }

    async fn delete_role(&self, id: &RoleId) -> Result<(), Error> {
        self.load_role(id).await?;
        if !self.roles.delete(id).await.map_err(map_store_error)? {
            return Err(Error::not_found("role not found"));
        }
        self.cache
            .invalidate(&[Self::role_key(id), Self::all_key()])
            .await
    }
}

#[cfg(test)]
#[path = "role_service_tests.rs"]
mod tests;
