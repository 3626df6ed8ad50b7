//! Todo domain service.
//!
//! Every operation is scoped to the calling user. A todo owned by someone
//! else is reported exactly like a missing one, so callers cannot probe for
//! other users' todos.
//!
//! Reads are cached under `todos:<id>` and `todos:all:<owner>`. Writes also
//! clear `todos:all`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use super::cache_aside::CacheAside;
use super::port_error_mapping::map_store_error;
use super::ports::{
    CacheKey, CacheNamespace, StoreError, TodoRepository, TodosCommand, TodosQuery,
};
use super::{Error, NewTodo, Todo, TodoChanges, TodoId, UserId};

/// Todo service implementing [`TodosQuery`] and [`TodosCommand`].
#[derive(Clone)]
pub struct TodoService<T> {
    todos: Arc<T>,
    cache: CacheAside,
    clock: Arc<dyn Clock>,
}

impl<T> TodoService<T> {
    /// Create a new service over the given repository and cache.
    pub fn new(todos: Arc<T>, cache: CacheAside, clock: Arc<dyn Clock>) -> Self {
        Self {
            todos,
            cache,
            clock,
        }
    }

    fn todo_key(id: &TodoId) -> CacheKey {
        CacheKey::entity(CacheNamespace::Todos, id)
    }

    fn owner_key(owner: &UserId) -> CacheKey {
        CacheKey::owned_collection(CacheNamespace::Todos, owner)
    }

    fn stale_keys(id: &TodoId, owner: &UserId) -> [CacheKey; 3] {
        [
            Self::todo_key(id),
            CacheKey::collection(CacheNamespace::Todos),
            Self::owner_key(owner),
        ]
    }

    fn not_found() -> Error {
        Error::not_found("todo not found")
    }

    fn owned(todo: Todo, owner: &UserId) -> Result<Todo, Error> {
        if todo.is_owned_by(owner) {
            Ok(todo)
        } else {
            Err(Self::not_found())
        }
    }
}

impl<T> TodoService<T>
where
    T: TodoRepository,
{
    async fn load_todo(&self, id: &TodoId) -> Result<Todo, Error> {
        self.todos
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(Self::not_found)
    }
}

#[async_trait]
impl<T> TodosQuery for TodoService<T>
where
    T: TodoRepository,
{
    async fn list_todos(&self, owner: &UserId) -> Result<Vec<Todo>, Error> {
        self.cache
            .read_through(&Self::owner_key(owner), || async {
                self.todos
                    .list_by_owner(owner)
                    .await
                    .map_err(map_store_error)
            })
            .await
    }

    async fn get_todo(&self, id: &TodoId, owner: &UserId) -> Result<Todo, Error> {
        let todo = self
            .cache
            .read_through(&Self::todo_key(id), || self.load_todo(id))
            .await?;
        Self::owned(todo, owner)
    }
}

#[async_trait]
impl<T> TodosCommand for TodoService<T>
where
    T: TodoRepository,
{
    async fn create_todo(&self, owner: &UserId, todo: NewTodo) -> Result<Todo, Error> {
        let now = self.clock.utc();
        let todo = Todo {
            id: TodoId::generate(),
            title: todo.title,
            description: todo.description,
            is_completed: todo.is_completed,
            user_id: *owner,
            created_at: now,
            updated_at: now,
        };
        // A token can outlive its user; the owner row is then gone.
        self.todos.insert(&todo).await.map_err(|error| match error {
            StoreError::MissingReference { .. } => Error::not_found("user not found"),
            other => map_store_error(other),
        })?;
        self.cache
            .invalidate(&[
                CacheKey::collection(CacheNamespace::Todos),
                Self::owner_key(owner),
            ])
            .await?;
        Ok(todo)
    }

    async fn update_todo(
        &self,
        id: &TodoId,
        owner: &UserId,
        changes: TodoChanges,
    ) -> Result<Todo, Error> {
        let mut todo = Self::owned(self.load_todo(id).await?, owner)?;
        changes.apply_to(&mut todo);
        todo.updated_at = self.clock.utc();

        if !self.todos.update(&todo).await.map_err(map_store_error)? {
            return Err(Self::not_found());
        }
        self.cache.invalidate(&Self::stale_keys(id, owner)).await?;
        Ok(todo)
    }

    async fn delete_todo(&self, id: &TodoId, owner: &UserId) -> Result<(), Error> {
        Self::owned(self.load_todo(id).await?, owner)?;
        if !self.todos.delete(id).await.map_err(map_store_error)? {
            return Err(Self::not_found());
        }
        self.cache.invalidate(&Self::stale_keys(id, owner)).await
    }
}

#[cfg(test)]
#[path = "todo_service_tests.rs"]
mod tests;
