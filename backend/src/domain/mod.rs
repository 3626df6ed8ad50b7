//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities, the transport-agnostic error type
//! and the services that orchestrate store and cache access. Inbound adapters
//! talk to services only through the driving ports in [`ports`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: domain error payload and stable code.
//! - [`User`], [`Role`], [`Todo`]: entities as stored and cached.
//! - [`UserService`], [`RoleService`], [`TodoService`]: cache-aside
//!   services implementing the driving ports.
//! - [`CacheAside`]: shared read-through and invalidation helper.

mod auth;
mod cache_aside;
mod entity_id;
pub mod error;
mod port_error_mapping;
pub mod ports;
mod role;
mod role_change;
mod role_service;
mod todo;
mod todo_service;
mod trace_id;
mod user;
mod user_service;

pub use self::auth::{AccessClaims, AccessToken, LoginCredentials};
pub use self::cache_aside::{CacheAside, DEFAULT_CACHE_TTL};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::role::{AuthLevel, ROLE_NAME_MAX, Role, RoleDraft, RoleId, RoleName, RoleValidationError};
pub use self::role_change::{ChangeRoleRequest, RoleChangeAction, RoleChangeItem, RoleChangeSet};
pub use self::role_service::RoleService;
pub use self::todo::{
    NewTodo, TODO_FIELD_MAX, Todo, TodoChanges, TodoDescription, TodoId, TodoTitle,
    TodoValidationError,
};
pub use self::todo_service::TodoService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NewUser, Password, PasswordHash, USER_FIELD_MAX, User, UserChanges, UserCredentials,
    UserId, UserValidationError, Username,
};
pub use self::user_service::{ACCESS_TOKEN_TTL_HOURS, CredentialServices, UserService};
