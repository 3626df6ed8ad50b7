//! PostgreSQL-backed `TodoRepository` implementation using Diesel ORM.
//!
//! Ownership is not checked here; the service compares the owner after
//! loading so that a mismatch and a missing row look the same to callers.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreError, TodoRepository};
use crate::domain::{Todo, TodoId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::TodoRow;
use super::pool::DbPool;
use super::schema::todos;

/// Diesel-backed implementation of the `TodoRepository` port.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Todo>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TodoRow> = todos::table
            .filter(todos::user_id.eq(*owner.as_uuid()))
            .select(TodoRow::as_select())
            .order(todos::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TodoRow> = todos::table
            .find(*id.as_uuid())
            .select(TodoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Todo::try_from).transpose()
    }

    async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(todos::table)
            .values(TodoRow::from(todo))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, todo: &Todo) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(todos::table.find(*todo.id.as_uuid()))
            .set(TodoRow::from(todo))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(todos::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
