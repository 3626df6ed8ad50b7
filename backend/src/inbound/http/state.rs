//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AuthLevel;
use crate::domain::ports::{
    AuthorizationQuery, LoginService, RolesCommand, RolesQuery, TodosCommand, TodosQuery,
    TokenIssuer, UsersCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub authorization: Arc<dyn AuthorizationQuery>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub roles: Arc<dyn RolesQuery>,
    pub roles_command: Arc<dyn RolesCommand>,
    pub todos: Arc<dyn TodosQuery>,
    pub todos_command: Arc<dyn TodosCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub authorization: Arc<dyn AuthorizationQuery>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub roles: Arc<dyn RolesQuery>,
    pub roles_command: Arc<dyn RolesCommand>,
    pub todos: Arc<dyn TodosQuery>,
    pub todos_command: Arc<dyn TodosCommand>,
    /// Minimum effective level required by the admin routes.
    pub admin_level: AuthLevel,
}

impl HttpState {
    /// Construct state from a ports bundle and the admin threshold.
    pub fn new(ports: HttpStatePorts, admin_level: AuthLevel) -> Self {
        let HttpStatePorts {
            login,
            authorization,
            tokens,
            users,
            users_command,
            roles,
            roles_command,
            todos,
            todos_command,
        } = ports;
        Self {
            login,
            authorization,
            tokens,
            users,
            users_command,
            roles,
            roles_command,
            todos,
            todos_command,
            admin_level,
        }
    }
}
