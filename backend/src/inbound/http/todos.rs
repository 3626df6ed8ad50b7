//! Todo handlers scoped to the authenticated caller.
//!
//! The owner always comes from the bearer token, never from the request, so
//! a todo belonging to someone else answers 404 like a missing one.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, NewTodo, Todo, TodoChanges, TodoDescription, TodoId, TodoTitle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, todo_validation_error};

/// New todo for the caller; the description defaults to empty and the todo
/// starts open unless `is_completed` says otherwise.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateTodoRequest {
    /// Non-blank title.
    #[schema(example = "Buy milk")]
    pub title: String,
    /// Optional free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Create the todo already completed.
    #[serde(default)]
    pub is_completed: bool,
}

impl TryFrom<CreateTodoRequest> for NewTodo {
    type Error = Error;

    fn try_from(value: CreateTodoRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: TodoTitle::new(value.title).map_err(todo_validation_error)?,
            description: value
                .description
                .map(TodoDescription::new)
                .transpose()
                .map_err(todo_validation_error)?
                .unwrap_or_default(),
            is_completed: value.is_completed,
        })
    }
}

/// Partial todo update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl TryFrom<UpdateTodoRequest> for TodoChanges {
    type Error = Error;

    fn try_from(value: UpdateTodoRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value
                .title
                .map(TodoTitle::new)
                .transpose()
                .map_err(todo_validation_error)?,
            description: value
                .description
                .map(TodoDescription::new)
                .transpose()
                .map_err(todo_validation_error)?,
            is_completed: value.is_completed,
        })
    }
}

fn todo_id_from_path(raw: &str) -> Result<TodoId, Error> {
    parse_id(raw, FieldName::new("id"))
}

#[utoipa::path(
    get,
    path = "/api/v1/todos",
    responses(
        (status = 200, description = "The caller's todos", body = [Todo]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Backend unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "listTodos"
)]
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Todo>>> {
    Ok(web::Json(state.todos.list_todos(&caller.user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateTodoRequest>,
) -> ApiResult<HttpResponse> {
    let todo = NewTodo::try_from(payload.into_inner())?;
    let created = state
        .todos_command
        .create_todo(&caller.user_id, todo)
        .await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo", body = Todo),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Missing or owned by someone else", body = Error)
    ),
    tags = ["todos"],
    operation_id = "getTodo"
)]
#[get("/todos/{id}")]
pub async fn get_todo(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Todo>> {
    let id = todo_id_from_path(&path)?;
    Ok(web::Json(state.todos.get_todo(&id, &caller.user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated todo", body = Todo),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Missing or owned by someone else", body = Error)
    ),
    tags = ["todos"],
    operation_id = "updateTodo"
)]
#[put("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateTodoRequest>,
) -> ApiResult<web::Json<Todo>> {
    let id = todo_id_from_path(&path)?;
    let changes = TodoChanges::try_from(payload.into_inner())?;
    let todo = state
        .todos_command
        .update_todo(&id, &caller.user_id, changes)
        .await?;
    Ok(web::Json(todo))
}

#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Missing or owned by someone else", body = Error)
    ),
    tags = ["todos"],
    operation_id = "deleteTodo"
)]
#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = todo_id_from_path(&path)?;
    state.todos_command.delete_todo(&id, &caller.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
