//! Tests for todo handlers.

use super::*;
use crate::domain::ErrorCode;
use crate::inbound::http::test_utils::{MockPorts, bearer, sample_todo};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .service(
                web::scope("/api/v1")
                    .service(list_todos)
                    .service(create_todo)
                    .service(get_todo)
                    .service(update_todo)
                    .service(delete_todo),
            ),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

#[actix_web::test]
async fn create_uses_the_caller_as_owner() {
    let mut ports = MockPorts::default();
    let caller = ports.accept_token();
    ports
        .todos_command
        .expect_create_todo()
        .withf(move |owner, todo| {
            *owner == caller
                && todo.title.as_ref() == "x"
                && todo.description.as_ref().is_empty()
                && !todo.is_completed
        })
        .return_once(move |owner, _| Ok(sample_todo(TodoId::generate(), *owner)));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/v1/todos")
            .insert_header(bearer())
            .set_json(json!({ "title": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body.get("user_id").and_then(Value::as_str),
        Some(caller.to_string().as_str())
    );
}

#[actix_web::test]
async fn create_keeps_the_completion_flag() {
    let mut ports = MockPorts::default();
    ports.accept_token();
    ports
        .todos_command
        .expect_create_todo()
        .withf(|_, todo| todo.is_completed)
        .return_once(|owner, _| {
            let mut todo = sample_todo(TodoId::generate(), *owner);
            todo.is_completed = true;
            Ok(todo)
        });

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/v1/todos")
            .insert_header(bearer())
            .set_json(json!({ "title": "x", "is_completed": true })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.get("is_completed"), Some(&json!(true)));
}

#[actix_web::test]
async fn list_returns_only_the_callers_todos() {
    let mut ports = MockPorts::default();
    let caller = ports.accept_token();
    ports
        .todos
        .expect_list_todos()
        .withf(move |owner| *owner == caller)
        .return_once(move |owner| Ok(vec![sample_todo(TodoId::generate(), *owner)]));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get()
            .uri("/api/v1/todos")
            .insert_header(bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn foreign_todos_look_missing() {
    let mut ports = MockPorts::default();
    ports.accept_token();
    ports
        .todos_command
        .expect_update_todo()
        .return_once(|_, _, _| Err(Error::not_found("todo not found")));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/todos/{}", TodoId::generate()))
            .insert_header(bearer())
            .set_json(json!({ "title": "y" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
}

#[rstest]
#[case::blank_title(json!({ "title": "  " }), "title")]
#[case::long_description(json!({ "title": "x", "description": "d".repeat(256) }), "description")]
#[actix_web::test]
async fn create_validates_fields(#[case] payload: Value, #[case] field: &str) {
    let mut ports = MockPorts::default();
    ports.accept_token();
    ports.todos_command.expect_create_todo().never();

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/v1/todos")
            .insert_header(bearer())
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some(field)
    );
}

#[actix_web::test]
async fn todos_require_a_token() {
    let (status, _) = call(
        MockPorts::default(),
        actix_test::TestRequest::get().uri("/api/v1/todos"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn delete_answers_no_content() {
    let mut ports = MockPorts::default();
    let caller = ports.accept_token();
    let id = TodoId::generate();
    ports
        .todos_command
        .expect_delete_todo()
        .withf(move |todo, owner| *todo == id && *owner == caller)
        .return_once(|_, _| Ok(()));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/todos/{id}"))
            .insert_header(bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[rstest]
fn completion_only_update_leaves_text_alone() {
    let changes = TodoChanges::try_from(UpdateTodoRequest {
        is_completed: Some(true),
        ..UpdateTodoRequest::default()
    })
    .expect("valid changes");
    assert_eq!(
        changes,
        TodoChanges {
            is_completed: Some(true),
            ..TodoChanges::default()
        }
    );
}

#[rstest]
fn blank_title_update_is_rejected() {
    let err = TodoChanges::try_from(UpdateTodoRequest {
        title: Some(String::new()),
        ..UpdateTodoRequest::default()
    })
    .expect_err("blank title");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
