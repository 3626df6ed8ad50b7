//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the domain schemas they return
//! and the bearer-token security scheme. Swagger UI serves it at `/docs` in
//! debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Role, Todo, User};
use crate::inbound::http::roles::RoleRequest;
use crate::inbound::http::todos::{CreateTodoRequest, UpdateTodoRequest};
use crate::inbound::http::users::{
    ChangeRolesRequest, CreateUserRequest, LoginRequest, LoginResponse, RoleChangeItemRequest,
    UpdateUserRequest,
};

/// Adds the `BearerAuth` scheme for tokens issued by `POST /api/v1/login`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Todo backend API",
        description = "Users, roles and todos behind bearer-token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::change_roles,
        crate::inbound::http::roles::list_roles,
        crate::inbound::http::roles::create_role,
        crate::inbound::http::roles::get_role,
        crate::inbound::http::roles::update_role,
        crate::inbound::http::roles::delete_role,
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::get_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::delete_todo,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Role,
        Todo,
        Error,
        ErrorCode,
        CreateUserRequest,
        UpdateUserRequest,
        LoginRequest,
        LoginResponse,
        ChangeRolesRequest,
        RoleChangeItemRequest,
        RoleRequest,
        CreateTodoRequest,
        UpdateTodoRequest,
    )),
    tags(
        (name = "users", description = "Registration, login and profile"),
        (name = "todos", description = "The caller's todos"),
        (name = "admin", description = "User and role administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
