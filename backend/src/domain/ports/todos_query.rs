//! Driving port for todo reads scoped to the calling user.
use async_trait::async_trait;

use crate::domain::{Error, Todo, TodoId, UserId};

/// Cached, owner-scoped todo reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodosQuery: Send + Sync {
    /// Todos owned by `owner`.
    async fn list_todos(&self, owner: &UserId) -> Result<Vec<Todo>, Error>;

    /// One todo; a todo owned by someone else is not found.
    async fn get_todo(&self, id: &TodoId, owner: &UserId) -> Result<Todo, Error>;
}
