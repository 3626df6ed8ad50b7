//! Shared-state store backing the in-memory adapters.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::ports::{
    RoleRepository, StoreError, TodoRepository, UserRepository, UserRoleStore,
    UserRoleTransaction,
};
use crate::domain::{
    AuthLevel, Email, PasswordHash, Role, RoleId, Todo, TodoId, User, UserCredentials, UserId,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, StoredUser>,
    roles: BTreeMap<RoleId, Role>,
    todos: BTreeMap<TodoId, Todo>,
    user_roles: BTreeSet<(UserId, RoleId)>,
}

impl StoreState {
    fn ensure_email_free(&self, email: &Email, except: Option<&UserId>) -> Result<(), StoreError> {
        let taken = self
            .users
            .values()
            .any(|stored| &stored.user.email == email && Some(&stored.user.id) != except);
        if taken {
            Err(StoreError::conflict("email"))
        } else {
            Ok(())
        }
    }
}

/// Process-local store implementing every persistence port.
///
/// Clones share the same state. Role-assignment transactions hold the state
/// lock for their whole life, so they are serialised against every other
/// store call.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Roles currently associated with `user`.
    pub async fn role_ids_of(&self, user: &UserId) -> Vec<RoleId> {
        let state = self.state.lock().await;
        state
            .user_roles
            .iter()
            .filter(|(owner, _)| owner == user)
            .map(|(_, role)| *role)
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.values().map(|stored| stored.user.clone()).collect())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|stored| &stored.user.email == email)
            .map(|stored| UserCredentials {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn insert(&self, user: &User, password_hash: &PasswordHash) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.users.contains_key(&user.id) {
            return Err(StoreError::conflict("id"));
        }
        state.ensure_email_free(&user.email, None)?;
        state.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user.id) {
            return Ok(false);
        }
        state.ensure_email_free(&user.email, Some(&user.id))?;
        if let Some(stored) = state.users.get_mut(&user.id) {
            stored.user = user.clone();
            if let Some(hash) = password_hash {
                stored.password_hash = hash;
            }
        }
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if state.users.remove(id).is_none() {
            return Ok(false);
        }
        state.todos.retain(|_, todo| &todo.user_id != id);
        state.user_roles.retain(|(user, _)| user != id);
        Ok(true)
    }

    async fn todo_ids(&self, id: &UserId) -> Result<Vec<TodoId>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .todos
            .values()
            .filter(|todo| &todo.user_id == id)
            .map(|todo| todo.id)
            .collect())
    }

    async fn max_auth_level(&self, id: &UserId) -> Result<Option<AuthLevel>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .user_roles
            .iter()
            .filter(|(user, _)| user == id)
            .filter_map(|(_, role)| state.roles.get(role))
            .map(|role| role.auth_level)
            .max())
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Role>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.roles.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.roles.get(id).cloned())
    }

    async fn insert(&self, role: &Role) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.roles.contains_key(&role.id) {
            return Err(StoreError::conflict("id"));
        }
        state.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn update(&self, role: &Role) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        match state.roles.get_mut(&role.id) {
            Some(stored) => {
                *stored = role.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &RoleId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if state.roles.remove(id).is_none() {
            return Ok(false);
        }
        state.user_roles.retain(|(_, role)| role != id);
        Ok(true)
    }
}

#[async_trait]
impl TodoRepository for InMemoryStore {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Todo>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .todos
            .values()
            .filter(|todo| todo.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.todos.get(id).cloned())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&todo.user_id) {
            return Err(StoreError::missing_reference("user_id"));
        }
        if state.todos.contains_key(&todo.id) {
            return Err(StoreError::conflict("id"));
        }
        state.todos.insert(todo.id, todo.clone());
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        match state.todos.get_mut(&todo.id) {
            Some(stored) => {
                *stored = todo.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.todos.remove(id).is_some())
    }
}

/// Transaction over the locked store state.
///
/// Association writes go to a working copy that replaces the committed set
/// only on `commit`.
struct InMemoryUserRoleTransaction {
    state: OwnedMutexGuard<StoreState>,
    user_roles: BTreeSet<(UserId, RoleId)>,
}

#[async_trait]
impl UserRoleStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UserRoleTransaction>, StoreError> {
        let state = Arc::clone(&self.state).lock_owned().await;
        let user_roles = state.user_roles.clone();
        Ok(Box::new(InMemoryUserRoleTransaction { state, user_roles }))
    }
}

#[async_trait]
impl UserRoleTransaction for InMemoryUserRoleTransaction {
    async fn find_user(&mut self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_role(&mut self, id: &RoleId) -> Result<Option<Role>, StoreError> {
        Ok(self.state.roles.get(id).cloned())
    }

    async fn attach_roles(&mut self, user: &UserId, roles: &[RoleId]) -> Result<(), StoreError> {
        if !self.state.users.contains_key(user) {
            return Err(StoreError::missing_reference("user_id"));
        }
        for role in roles {
            if !self.state.roles.contains_key(role) {
                return Err(StoreError::missing_reference("role_id"));
            }
            self.user_roles.insert((*user, *role));
        }
        Ok(())
    }

    async fn detach_roles(&mut self, user: &UserId, roles: &[RoleId]) -> Result<(), StoreError> {
        for role in roles {
            self.user_roles.remove(&(*user, *role));
        }
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        let user_roles = std::mem::take(&mut self.user_roles);
        self.state.user_roles = user_roles;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
