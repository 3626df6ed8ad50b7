//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types
//! re-validate every field; a row that fails validation is reported as a
//! query error rather than silently repaired.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::StoreError;
use crate::domain::{
    AuthLevel, Email, PasswordHash, Role, RoleId, RoleName, Todo, TodoDescription, TodoId,
    TodoTitle, User, UserCredentials, UserId, Username,
};

use super::schema::{role_users, roles, todos, users};

fn corrupt(table: &str, id: Uuid, reason: impl std::fmt::Display) -> StoreError {
    tracing::warn!(table, %id, %reason, "stored row failed domain validation");
    StoreError::query(format!("invalid {table} row {id}: {reason}"))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading users without their password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|err| corrupt("users", row.id, err))?;
        let email = Email::new(row.email).map_err(|err| corrupt("users", row.id, err))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            username,
            email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row struct for reading a user together with the stored hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserCredentialsRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

impl TryFrom<UserCredentialsRow> for UserCredentials {
    type Error = StoreError;

    fn try_from(row: UserCredentialsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user: User::try_from(row.user)?,
            password_hash: PasswordHash::new(row.password_hash),
        })
    }
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for user updates; a `None` hash leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Row struct for reading and writing roles.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub auth_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Role> for RoleRow {
    fn from(role: &Role) -> Self {
        Self {
            id: *role.id.as_uuid(),
            name: role.name.to_string(),
            auth_level: role.auth_level.value(),
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

impl TryFrom<RoleRow> for Role {
    type Error = StoreError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let name = RoleName::new(row.name).map_err(|err| corrupt("roles", row.id, err))?;
        let auth_level =
            AuthLevel::new(row.auth_level).map_err(|err| corrupt("roles", row.id, err))?;
        Ok(Self {
            id: RoleId::from_uuid(row.id),
            name,
            auth_level,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable association between a user and a role.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = role_users)]
pub(crate) struct RoleUserRow {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

/// Row struct for reading and writing todos.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoRow {
    fn from(todo: &Todo) -> Self {
        Self {
            id: *todo.id.as_uuid(),
            title: todo.title.to_string(),
            description: String::from(todo.description.clone()),
            is_completed: todo.is_completed,
            user_id: *todo.user_id.as_uuid(),
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

impl TryFrom<TodoRow> for Todo {
    type Error = StoreError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let title = TodoTitle::new(row.title).map_err(|err| corrupt("todos", row.id, err))?;
        let description =
            TodoDescription::new(row.description).map_err(|err| corrupt("todos", row.id, err))?;
        Ok(Self {
            id: TodoId::from_uuid(row.id),
            title,
            description,
            is_completed: row.is_completed,
            user_id: UserId::from_uuid(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
