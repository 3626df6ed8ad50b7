//! Test helpers for inbound HTTP components.
//!
//! [`MockPorts`] holds one mockall double per port in [`HttpState`]; tests set
//! expectations on the fields they care about and convert the bundle into
//! state with [`MockPorts::into_state`].

use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, HeaderName};
use chrono::TimeDelta;

use crate::domain::ports::{
    MockAuthorizationQuery, MockLoginService, MockRolesCommand, MockRolesQuery,
    MockTodosCommand, MockTodosQuery, MockTokenIssuer, MockUsersCommand, MockUsersQuery,
};
use crate::domain::{
    AccessClaims, AuthLevel, Email, Role, RoleId, RoleName, Todo, TodoDescription, TodoId,
    TodoTitle, User, UserId, Username,
};
use crate::test_support::fixture_timestamp;

use super::state::{HttpState, HttpStatePorts};

/// Token accepted by [`MockPorts::accept_token`].
pub const TOKEN: &str = "test-token";

/// Admin threshold used by [`MockPorts::into_state`].
pub const ADMIN_LEVEL: i32 = 2;

/// `Authorization` header carrying [`TOKEN`].
pub fn bearer() -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TOKEN}"))
}

#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub authorization: MockAuthorizationQuery,
    pub tokens: MockTokenIssuer,
    pub users: MockUsersQuery,
    pub users_command: MockUsersCommand,
    pub roles: MockRolesQuery,
    pub roles_command: MockRolesCommand,
    pub todos: MockTodosQuery,
    pub todos_command: MockTodosCommand,
}

impl MockPorts {
    /// Accept [`TOKEN`] as belonging to a fresh caller and return their id.
    pub fn accept_token(&mut self) -> UserId {
        let user_id = UserId::generate();
        self.tokens
            .expect_verify()
            .withf(|token| token == TOKEN)
            .returning(move |_| {
                Ok(AccessClaims {
                    user_id,
                    username: Username::new("ada").expect("valid username"),
                    expires_at: fixture_timestamp() + TimeDelta::hours(1),
                })
            });
        user_id
    }

    /// Report `level` as the caller's effective authorization level.
    pub fn grant_level(&mut self, level: i32) {
        let level = AuthLevel::new(level).expect("non-negative level");
        self.authorization
            .expect_effective_auth_level()
            .returning(move |_| Ok(level));
    }

    /// Accept the token and grant the admin level in one step.
    pub fn admin(&mut self) -> UserId {
        let user_id = self.accept_token();
        self.grant_level(ADMIN_LEVEL);
        user_id
    }

    pub fn into_state(self) -> HttpState {
        let ports = HttpStatePorts {
            login: Arc::new(self.login),
            authorization: Arc::new(self.authorization),
            tokens: Arc::new(self.tokens),
            users: Arc::new(self.users),
            users_command: Arc::new(self.users_command),
            roles: Arc::new(self.roles),
            roles_command: Arc::new(self.roles_command),
            todos: Arc::new(self.todos),
            todos_command: Arc::new(self.todos_command),
        };
        HttpState::new(ports, AuthLevel::new(ADMIN_LEVEL).expect("non-negative level"))
    }
}

pub fn sample_user(id: UserId) -> User {
    User {
        id,
        username: Username::new("ada").expect("valid username"),
        email: Email::new("ada@example.com").expect("valid email"),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

pub fn sample_role(id: RoleId) -> Role {
    Role {
        id,
        name: RoleName::new("Admin").expect("valid name"),
        auth_level: AuthLevel::new(3).expect("valid level"),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

pub fn sample_todo(id: TodoId, owner: UserId) -> Todo {
    Todo {
        id,
        title: TodoTitle::new("Buy milk").expect("valid title"),
        description: TodoDescription::default(),
        is_completed: false,
        user_id: owner,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}
