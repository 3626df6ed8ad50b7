//! Users API handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"ada","email":"ada@example.com","password":"pw"}
//! POST /api/v1/login {"email":"ada@example.com","password":"pw"}
//! PUT /api/v1/profile {"email":"ada@example.org"}
//! GET /api/v1/admin/users
//! PATCH /api/v1/admin/users/{id}/roles {"items":[{"role_id":"…","action":"add"}]}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ChangeRoleRequest, Email, Error, LoginCredentials, NewUser, Password, RoleChangeAction,
    RoleChangeItem, RoleId, User, UserChanges, UserId, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, user_validation_error};

/// Account creation body shared by `POST /register` and `POST /admin/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: Username::new(value.username).map_err(user_validation_error)?,
            email: Email::new(value.email).map_err(user_validation_error)?,
            password: Password::new(value.password).map_err(user_validation_error)?,
        })
    }
}

/// Partial account update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserChanges {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: value
                .username
                .map(Username::new)
                .transpose()
                .map_err(user_validation_error)?,
            email: value
                .email
                .map(Email::new)
                .transpose()
                .map_err(user_validation_error)?,
            password: value
                .password
                .map(Password::new)
                .transpose()
                .map_err(user_validation_error)?,
        })
    }
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// One role mutation inside a role change request.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RoleChangeItemRequest {
    #[serde(alias = "id")]
    #[schema(format = Uuid)]
    pub role_id: String,
    /// `add` or `remove`.
    #[schema(example = "add")]
    pub action: String,
}

/// Body for `PATCH /api/v1/admin/users/{id}/roles`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ChangeRolesRequest {
    pub items: Vec<RoleChangeItemRequest>,
}

fn parse_role_items(items: Vec<RoleChangeItemRequest>) -> Result<Vec<RoleChangeItem>, Error> {
    items
        .into_iter()
        .map(|item| {
            Ok(RoleChangeItem {
                role_id: parse_id::<RoleId>(&item.role_id, FieldName::new("role_id"))?,
                action: item.action.parse::<RoleChangeAction>()?,
            })
        })
        .collect()
}

fn user_id_from_path(raw: &str) -> Result<UserId, Error> {
    parse_id(raw, FieldName::new("id"))
}

/// Create an account without authentication.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already exists", body = Error),
        (status = 503, description = "Backend unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = NewUser::try_from(payload.into_inner())?;
    let user = state.users_command.create_user(request).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Exchange credentials for a bearer token.
///
/// Unknown emails and wrong passwords produce the same 401 response.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(user_validation_error)?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        token: token.as_str().to_owned(),
    }))
}

/// Edit the caller's own account.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Email already exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let changes = UserChanges::try_from(payload.into_inner())?;
    let user = state
        .users_command
        .update_user(&caller.user_id, changes)
        .await?;
    Ok(web::Json(user))
}

/// List every account.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use todo_backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Backend unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _admin: AdminUser,
) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users.list_users().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Email already exists", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createUser"
)]
#[post("/admin/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = NewUser::try_from(payload.into_inner())?;
    let user = state.users_command.create_user(request).await?;
    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 400, description = "Invalid id", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getUser"
)]
#[get("/admin/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = user_id_from_path(&path)?;
    Ok(web::Json(state.users.get_user(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Email already exists", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateUser"
)]
#[patch("/admin/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = user_id_from_path(&path)?;
    let changes = UserChanges::try_from(payload.into_inner())?;
    Ok(web::Json(state.users_command.update_user(&id, changes).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_id_from_path(&path)?;
    state.users_command.delete_user(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Attach and detach roles in one transaction.
///
/// Every item is validated before anything is written; one bad action or
/// unknown role leaves the user's roles untouched.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/users/{id}/roles",
    params(("id" = String, Path, description = "User id")),
    request_body = ChangeRolesRequest,
    responses(
        (status = 204, description = "Roles changed"),
        (status = 400, description = "Invalid action or id", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown user or role", body = Error)
    ),
    tags = ["admin"],
    operation_id = "changeUserRoles"
)]
#[patch("/admin/users/{id}/roles")]
pub async fn change_roles(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<ChangeRolesRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = user_id_from_path(&path)?;
    let items = parse_role_items(payload.into_inner().items)?;
    state
        .users_command
        .change_roles(ChangeRoleRequest { user_id, items })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
