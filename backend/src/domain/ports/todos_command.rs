//! Driving port for todo mutations scoped to the calling user.
use async_trait::async_trait;

use crate::domain::{Error, NewTodo, Todo, TodoChanges, TodoId, UserId};

/// Owner-scoped todo writes, each followed by cache invalidation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodosCommand: Send + Sync {
    /// Create a todo owned by `owner`.
    async fn create_todo(&self, owner: &UserId, todo: NewTodo) -> Result<Todo, Error>;

    /// Apply a partial update to a todo owned by `owner`.
    async fn update_todo(
        &self,
        id: &TodoId,
        owner: &UserId,
        changes: TodoChanges,
    ) -> Result<Todo, Error>;

    /// Remove a todo owned by `owner`.
    async fn delete_todo(&self, id: &TodoId, owner: &UserId) -> Result<(), Error>;
}
