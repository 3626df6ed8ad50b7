//! PostgreSQL-backed `UserRoleStore` running role changes in one transaction.
//!
//! `begin` checks out an owned connection and opens a transaction on it. The
//! connection stays with the returned handle until `commit` or `rollback`.
//! A handle dropped mid-transaction takes its connection with it: the pool
//! sees an open transaction, discards the connection, and PostgreSQL rolls
//! the work back when the session closes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{StoreError, UserRoleStore, UserRoleTransaction};
use crate::domain::{Role, RoleId, User, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{RoleRow, RoleUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{role_users, roles, users};

type Manager = AnsiTransactionManager;

/// Diesel-backed implementation of the `UserRoleStore` port.
#[derive(Clone)]
pub struct DieselUserRoleStore {
    pool: DbPool,
}

impl DieselUserRoleStore {
    /// Create a store drawing transaction connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRoleStore for DieselUserRoleStore {
    async fn begin(&self) -> Result<Box<dyn UserRoleTransaction>, StoreError> {
        let mut conn = self.pool.get_owned().await.map_err(map_pool_error)?;
        <Manager as TransactionManager<AsyncPgConnection>>::begin_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)?;
        debug!("role assignment transaction opened");
        Ok(Box::new(DieselUserRoleTransaction { conn }))
    }
}

struct DieselUserRoleTransaction {
    conn: PooledConnection<'static, AsyncPgConnection>,
}

fn role_uuids(roles: &[RoleId]) -> Vec<Uuid> {
    roles.iter().map(|role| *role.as_uuid()).collect()
}

#[async_trait]
impl UserRoleTransaction for DieselUserRoleTransaction {
    async fn find_user(&mut self, id: &UserId) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn find_role(&mut self, id: &RoleId) -> Result<Option<Role>, StoreError> {
        let row: Option<RoleRow> = roles::table
            .find(*id.as_uuid())
            .select(RoleRow::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Role::try_from).transpose()
    }

    async fn attach_roles(&mut self, user: &UserId, roles: &[RoleId]) -> Result<(), StoreError> {
        let rows: Vec<RoleUserRow> = roles
            .iter()
            .map(|role| RoleUserRow {
                user_id: *user.as_uuid(),
                role_id: *role.as_uuid(),
            })
            .collect();
        let inserted = diesel::insert_into(role_users::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(requested = rows.len(), inserted, "roles attached");
        Ok(())
    }

    async fn detach_roles(&mut self, user: &UserId, roles: &[RoleId]) -> Result<(), StoreError> {
        let removed = diesel::delete(
            role_users::table
                .filter(role_users::user_id.eq(*user.as_uuid()))
                .filter(role_users::role_id.eq_any(role_uuids(roles))),
        )
        .execute(&mut *self.conn)
        .await
        .map_err(map_diesel_error)?;
        debug!(requested = roles.len(), removed, "roles detached");
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        <Manager as TransactionManager<AsyncPgConnection>>::commit_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), StoreError> {
        <Manager as TransactionManager<AsyncPgConnection>>::rollback_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }
}
