//! User domain service.
//!
//! Covers account CRUD with read-through caching under `users:<id>` and
//! `users:all`, credential login, effective authorization levels and the
//! transactional role change.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::{debug, warn};

use super::cache_aside::CacheAside;
use super::port_error_mapping::{map_hasher_error, map_store_error};
use super::ports::{
    AuthorizationQuery, CacheKey, CacheNamespace, LoginService, PasswordHasher, TokenError,
    TokenIssuer, UserRepository, UserRoleStore, UserRoleTransaction, UsersCommand, UsersQuery,
};
use super::{
    AccessClaims, AccessToken, AuthLevel, ChangeRoleRequest, Error, LoginCredentials, NewUser,
    RoleChangeSet, User, UserChanges, UserId,
};

/// Lifetime of an issued access token, in hours.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 24;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Credential collaborators used by login and password changes.
#[derive(Clone)]
pub struct CredentialServices {
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
}

/// User service implementing the user, login and authorization ports.
#[derive(Clone)]
pub struct UserService<U, S> {
    users: Arc<U>,
    user_roles: Arc<S>,
    cache: CacheAside,
    credentials: CredentialServices,
    clock: Arc<dyn Clock>,
}

impl<U, S> UserService<U, S> {
    /// Create a new service over the given stores and collaborators.
    pub fn new(
        users: Arc<U>,
        user_roles: Arc<S>,
        cache: CacheAside,
        credentials: CredentialServices,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            user_roles,
            cache,
            credentials,
            clock,
        }
    }

    fn user_key(id: &UserId) -> CacheKey {
        CacheKey::entity(CacheNamespace::Users, id)
    }

    fn all_key() -> CacheKey {
        CacheKey::collection(CacheNamespace::Users)
    }

    fn not_found() -> Error {
        Error::not_found("user not found")
    }

    fn map_token_error(error: TokenError) -> Error {
        warn!(%error, "access token signing failed");
        Error::internal(error.to_string())
    }
}

impl<U, S> UserService<U, S>
where
    U: UserRepository,
    S: UserRoleStore,
{
    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(Self::not_found)
    }

    async fn apply_role_changes(
        tx: &mut dyn UserRoleTransaction,
        request: &ChangeRoleRequest,
    ) -> Result<(), Error> {
        tx.find_user(&request.user_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(Self::not_found)?;

        let mut changes = RoleChangeSet::default();
        for item in &request.items {
            tx.find_role(&item.role_id)
                .await
                .map_err(map_store_error)?
                .ok_or_else(|| Error::not_found("role not found"))?;
            changes.push(item.role_id, item.action);
        }

        if !changes.add.is_empty() {
            tx.attach_roles(&request.user_id, &changes.add)
                .await
                .map_err(map_store_error)?;
        }
        if !changes.remove.is_empty() {
            tx.detach_roles(&request.user_id, &changes.remove)
                .await
                .map_err(map_store_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U, S> UsersQuery for UserService<U, S>
where
    U: UserRepository,
    S: UserRoleStore,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.cache
            .read_through(&Self::all_key(), || async {
                self.users.list().await.map_err(map_store_error)
            })
            .await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.cache
            .read_through(&Self::user_key(id), || self.load_user(id))
            .await
    }
}

#[async_trait]
impl<U, S> UsersCommand for UserService<U, S>
where
    U: UserRepository,
    S: UserRoleStore,
{
    async fn create_user(&self, request: NewUser) -> Result<User, Error> {
        let password_hash = self
            .credentials
            .hasher
            .hash(&request.password)
            .await
            .map_err(map_hasher_error)?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::generate(),
            username: request.username,
            email: request.email,
            created_at: now,
            updated_at: now,
        };
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_store_error)?;
        self.cache.invalidate(&[Self::all_key()]).await?;
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        let mut user = self.load_user(id).await?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        let password_hash = match changes.password {
            Some(password) => Some(
                self.credentials
                    .hasher
                    .hash(&password)
                    .await
                    .map_err(map_hasher_error)?,
            ),
            None => None,
        };
        user.updated_at = self.clock.utc();

        if !self
            .users
            .update(&user, password_hash)
            .await
            .map_err(map_store_error)?
        {
            return Err(Self::not_found());
        }
        self.cache
            .invalidate(&[Self::user_key(id), Self::all_key()])
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        self.load_user(id).await?;
        // The user's todos are removed with them, so their keys go too.
        let todo_ids = self.users.todo_ids(id).await.map_err(map_store_error)?;
        if !self.users.delete(id).await.map_err(map_store_error)? {
            return Err(Self::not_found());
        }
        let mut keys = vec![
            Self::user_key(id),
            Self::all_key(),
            CacheKey::collection(CacheNamespace::Todos),
            CacheKey::owned_collection(CacheNamespace::Todos, id),
        ];
        keys.extend(
            todo_ids
                .iter()
                .map(|todo| CacheKey::entity(CacheNamespace::Todos, todo)),
        );
        self.cache.invalidate(&keys).await
    }

    async fn change_roles(&self, request: ChangeRoleRequest) -> Result<(), Error> {
        let mut tx = self.user_roles.begin().await.map_err(map_store_error)?;
        match Self::apply_role_changes(tx.as_mut(), &request).await {
            Ok(()) => tx.commit().await.map_err(map_store_error),
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(%rollback_error, user_id = %request.user_id, "role change rollback failed");
                }
                Err(error)
            }
        }
    }
}

#[async_trait]
impl<U, S> LoginService for UserService<U, S>
where
    U: UserRepository,
    S: UserRoleStore,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let account = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_store_error)?;

        // Always pay for one hash comparison so unknown emails take as long
        // as wrong passwords.
        let hash = account.as_ref().map_or_else(
            || self.credentials.hasher.dummy_hash(),
            |found| found.password_hash.clone(),
        );
        let verified = match self
            .credentials
            .hasher
            .verify(credentials.password(), &hash)
            .await
        {
            Ok(verified) => verified,
            Err(error) => {
                warn!(%error, "password verification failed");
                false
            }
        };

        let Some(found) = account.filter(|_| verified) else {
            debug!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let claims = AccessClaims {
            user_id: found.user.id,
            username: found.user.username,
            expires_at: self.clock.utc() + TimeDelta::hours(ACCESS_TOKEN_TTL_HOURS),
        };
        self.credentials
            .tokens
            .issue(&claims)
            .map_err(Self::map_token_error)
    }
}

#[async_trait]
impl<U, S> AuthorizationQuery for UserService<U, S>
where
    U: UserRepository,
    S: UserRoleStore,
{
    async fn effective_auth_level(&self, user: &UserId) -> Result<AuthLevel, Error> {
        Ok(self
            .users
            .max_auth_level(user)
            .await
            .map_err(map_store_error)?
            .unwrap_or(AuthLevel::NONE))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
