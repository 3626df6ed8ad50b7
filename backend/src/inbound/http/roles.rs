//! Role administration handlers.
//!
//! Every route here requires an [`AdminUser`].

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthLevel, Error, Role, RoleDraft, RoleId, RoleName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, role_validation_error};

/// Body for role creation and replacement.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RoleRequest {
    #[schema(example = "Admin")]
    pub name: String,
    #[schema(example = 3, minimum = 0)]
    pub auth_level: i32,
}

impl TryFrom<RoleRequest> for RoleDraft {
    type Error = Error;

    fn try_from(value: RoleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: RoleName::new(value.name).map_err(role_validation_error)?,
            auth_level: AuthLevel::new(value.auth_level).map_err(role_validation_error)?,
        })
    }
}

fn role_id_from_path(raw: &str) -> Result<RoleId, Error> {
    parse_id(raw, FieldName::new("id"))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/roles",
    responses(
        (status = 200, description = "Roles", body = [Role]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listRoles"
)]
#[get("/admin/roles")]
pub async fn list_roles(
    state: web::Data<HttpState>,
    _admin: AdminUser,
) -> ApiResult<web::Json<Vec<Role>>> {
    Ok(web::Json(state.roles.list_roles().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createRole"
)]
#[post("/admin/roles")]
pub async fn create_role(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<RoleRequest>,
) -> ApiResult<HttpResponse> {
    let draft = RoleDraft::try_from(payload.into_inner())?;
    let role = state.roles_command.create_role(draft).await?;
    Ok(HttpResponse::Created().json(role))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/roles/{id}",
    params(("id" = String, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getRole"
)]
#[get("/admin/roles/{id}")]
pub async fn get_role(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Role>> {
    let id = role_id_from_path(&path)?;
    Ok(web::Json(state.roles.get_role(&id).await?))
}

/// Replace a role's name and level.
#[utoipa::path(
    put,
    path = "/api/v1/admin/roles/{id}",
    params(("id" = String, Path, description = "Role id")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Updated role", body = Role),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateRole"
)]
#[put("/admin/roles/{id}")]
pub async fn update_role(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<web::Json<Role>> {
    let id = role_id_from_path(&path)?;
    let draft = RoleDraft::try_from(payload.into_inner())?;
    Ok(web::Json(state.roles_command.update_role(&id, draft).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/roles/{id}",
    params(("id" = String, Path, description = "Role id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteRole"
)]
#[delete("/admin/roles/{id}")]
pub async fn delete_role(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = role_id_from_path(&path)?;
    state.roles_command.delete_role(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
