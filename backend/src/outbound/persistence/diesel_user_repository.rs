//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Password hashes are only read by `find_credentials_by_email`; every other
//! read selects the public user columns.

use async_trait::async_trait;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreError, UserRepository};
use crate::domain::{AuthLevel, Email, PasswordHash, TodoId, User, UserCredentials, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserCredentialsRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::{role_users, roles, todos, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserCredentialsRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserCredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserCredentials::try_from).transpose()
    }

    async fn insert(&self, user: &User, password_hash: &PasswordHash) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: password_hash.as_str(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: password_hash.as_ref().map(PasswordHash::as_str),
            updated_at: user.updated_at,
        };
        let updated = diesel::update(users::table.find(*user.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn todo_ids(&self, id: &UserId) -> Result<Vec<TodoId>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<uuid::Uuid> = todos::table
            .filter(todos::user_id.eq(*id.as_uuid()))
            .select(todos::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(TodoId::from).collect())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn max_auth_level(&self, id: &UserId) -> Result<Option<AuthLevel>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let level: Option<i32> = role_users::table
            .inner_join(roles::table)
            .filter(role_users::user_id.eq(*id.as_uuid()))
            .select(max(roles::auth_level))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        level
            .map(|value| {
                AuthLevel::new(value).map_err(|err| StoreError::query(err.to_string()))
            })
            .transpose()
    }
}
