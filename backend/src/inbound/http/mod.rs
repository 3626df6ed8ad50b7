//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`api_scope`] mounts every `/api/v1` route along with the extractor
//! configuration that turns malformed bodies and paths into `invalid_request`
//! errors. Handlers read their ports from [`state::HttpState`], which the
//! caller registers as app data.

pub mod auth;
pub mod error;
pub mod health;
pub mod roles;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod todos;
pub mod users;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Build the `/api/v1` scope with every REST handler registered.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use todo_backend::inbound::http::api_scope;
///
/// let app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::register)
        .service(users::login)
        .service(users::update_profile)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::change_roles)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(roles::list_roles)
        .service(roles::create_role)
        .service(roles::get_role)
        .service(roles::update_role)
        .service(roles::delete_role)
        .service(todos::list_todos)
        .service(todos::create_todo)
        .service(todos::get_todo)
        .service(todos::update_todo)
        .service(todos::delete_todo)
}
