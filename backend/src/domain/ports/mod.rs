//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Query`, `*Command`, [`LoginService`],
//! [`AuthorizationQuery`]) are called by inbound adapters. Driven ports
//! (repositories, [`Cache`], [`PasswordHasher`], [`TokenIssuer`],
//! [`UserRoleStore`]) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod authorization_query;
mod cache;
mod cache_key;
mod login_service;
mod password_hasher;
mod role_repository;
mod roles_command;
mod roles_query;
mod store_error;
mod todo_repository;
mod todos_command;
mod todos_query;
mod token_issuer;
mod user_repository;
mod user_role_store;
mod users_command;
mod users_query;

#[cfg(test)]
pub use authorization_query::MockAuthorizationQuery;
pub use authorization_query::AuthorizationQuery;
#[cfg(test)]
pub use cache::MockCache;
pub use cache::{Cache, CacheError};
pub use cache_key::{CacheKey, CacheNamespace};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::RoleRepository;
#[cfg(test)]
pub use roles_command::MockRolesCommand;
pub use roles_command::RolesCommand;
#[cfg(test)]
pub use roles_query::MockRolesQuery;
pub use roles_query::RolesQuery;
pub use store_error::StoreError;
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::TodoRepository;
#[cfg(test)]
pub use todos_command::MockTodosCommand;
pub use todos_command::TodosCommand;
#[cfg(test)]
pub use todos_query::MockTodosQuery;
pub use todos_query::TodosQuery;
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
pub use user_role_store::{UserRoleStore, UserRoleTransaction};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
