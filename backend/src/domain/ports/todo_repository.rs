//! Port abstraction for todo persistence.
use async_trait::async_trait;

use crate::domain::{Todo, TodoId, UserId};

use super::StoreError;

/// Non-transactional todo persistence. Ownership is enforced by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todos owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Todo>, StoreError>;

    /// Fetch a todo by identifier regardless of owner.
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// Insert a new todo.
    async fn insert(&self, todo: &Todo) -> Result<(), StoreError>;

    /// Replace a stored todo's attributes. Returns whether a row matched.
    async fn update(&self, todo: &Todo) -> Result<bool, StoreError>;

    /// Remove a todo. Returns whether a row matched.
    async fn delete(&self, id: &TodoId) -> Result<bool, StoreError>;
}
