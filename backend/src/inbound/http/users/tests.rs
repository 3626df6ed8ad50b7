//! Tests for users API handlers.

use super::*;
use crate::domain::{AccessToken, ErrorCode};
use crate::inbound::http::test_utils::{MockPorts, bearer, sample_user};
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
                    .service(register)
                    .service(login)
                    .service(update_profile)
                    .service(list_users)
                    .service(create_user)
                    .service(change_roles)
                    .service(get_user)
                    .service(update_user)
                    .service(delete_user),
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
async fn register_creates_the_account() {
    let mut ports = MockPorts::default();
    let id = UserId::generate();
    ports
        .users_command
        .expect_create_user()
        .withf(|request| {
            request.username.as_ref() == "ada"
                && request.email.as_ref() == "ada@example.com"
                && request.password.expose() == "secret"
        })
        .return_once(move |_| Ok(sample_user(id)));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "secret",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.get("id").and_then(Value::as_str), Some(id.to_string().as_str()));
    assert!(body.get("password").is_none());
}

#[rstest]
#[case::blank_username(json!({"username": " ", "email": "ada@example.com", "password": "pw"}), "username")]
#[case::bad_email(json!({"username": "ada", "email": "nope", "password": "pw"}), "email")]
#[case::empty_password(json!({"username": "ada", "email": "ada@example.com", "password": ""}), "password")]
#[actix_web::test]
async fn register_rejects_invalid_fields(#[case] payload: Value, #[case] field: &str) {
    let (status, body) = call(
        MockPorts::default(),
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("invalid_request"));
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some(field)
    );
}

#[actix_web::test]
async fn register_reports_duplicate_email_as_conflict() {
    let mut ports = MockPorts::default();
    ports.users_command.expect_create_user().return_once(|_| {
        Err(Error::conflict("email already exists").with_details(json!({"field": "email"})))
    });

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "secret",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.get("message").and_then(Value::as_str), Some("email already exists"));
}

#[actix_web::test]
async fn login_returns_the_token() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_login()
        .withf(|credentials| credentials.email().as_ref() == "ada@example.com")
        .return_once(|_| Ok(AccessToken::new("signed.jwt.value")));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post().uri("/api/v1/login").set_json(&LoginRequest {
            email: "ada@example.com".into(),
            password: "secret".into(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "token": "signed.jwt.value" }));
}

#[actix_web::test]
async fn login_passes_the_generic_rejection_through() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_login()
        .return_once(|_| Err(Error::unauthorized("invalid email or password")));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post().uri("/api/v1/login").set_json(&LoginRequest {
            email: "ghost@example.com".into(),
            password: "anything".into(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("unauthorized"));
}

#[actix_web::test]
async fn profile_update_targets_the_caller() {
    let mut ports = MockPorts::default();
    let caller = ports.accept_token();
    ports
        .users_command
        .expect_update_user()
        .withf(move |id, changes| {
            *id == caller
                && changes.username.is_none()
                && changes.email.as_ref().map(ToString::to_string).as_deref() == Some("ada@example.org")
        })
        .return_once(move |id, _| Ok(sample_user(*id)));

    let (status, _) = call(
        ports,
        actix_test::TestRequest::put()
            .uri("/api/v1/profile")
            .insert_header(bearer())
            .set_json(json!({ "email": "ada@example.org" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn profile_requires_a_token() {
    let (status, _) = call(
        MockPorts::default(),
        actix_test::TestRequest::put()
            .uri("/api/v1/profile")
            .set_json(json!({ "email": "ada@example.org" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_routes_refuse_low_levels() {
    let mut ports = MockPorts::default();
    ports.accept_token();
    ports.grant_level(1);

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/users")
            .insert_header(bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("forbidden"));
}

#[actix_web::test]
async fn admin_lists_users() {
    let mut ports = MockPorts::default();
    ports.admin();
    let id = UserId::generate();
    ports
        .users
        .expect_list_users()
        .return_once(move || Ok(vec![sample_user(id)]));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/users")
            .insert_header(bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn malformed_path_ids_are_bad_requests() {
    let mut ports = MockPorts::default();
    ports.admin();

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/users/not-a-uuid")
            .insert_header(bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some("invalid_uuid")
    );
}

#[actix_web::test]
async fn missing_users_are_not_found() {
    let mut ports = MockPorts::default();
    ports.admin();
    ports
        .users_command
        .expect_delete_user()
        .return_once(|_| Err(Error::not_found("user not found")));

    let (status, _) = call(
        ports,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/users/{}", UserId::generate()))
            .insert_header(bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn change_roles_keeps_item_order() {
    let mut ports = MockPorts::default();
    ports.admin();
    let user_id = UserId::generate();
    let (first, second) = (RoleId::generate(), RoleId::generate());
    let expected = ChangeRoleRequest {
        user_id,
        items: vec![
            RoleChangeItem {
                role_id: first,
                action: RoleChangeAction::Add,
            },
            RoleChangeItem {
                role_id: second,
                action: RoleChangeAction::Remove,
            },
        ],
    };
    ports
        .users_command
        .expect_change_roles()
        .withf(move |request| *request == expected)
        .return_once(|_| Ok(()));

    let (status, _) = call(
        ports,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/admin/users/{user_id}/roles"))
            .insert_header(bearer())
            .set_json(json!({
                "items": [
                    { "role_id": first.to_string(), "action": "add" },
                    { "role_id": second.to_string(), "action": "remove" },
                ]
            })),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[rstest]
#[case::unknown_action(json!({ "role_id": "0192f1a4-5b6c-7d8e-9f01-23456789abcd", "action": "grant" }), "invalid action")]
#[case::bad_role_id(json!({ "role_id": "nope", "action": "add" }), "role_id must be a valid UUID")]
#[actix_web::test]
async fn change_roles_validates_before_calling_the_service(
    #[case] item: Value,
    #[case] message: &str,
) {
    let mut ports = MockPorts::default();
    ports.admin();
    ports.users_command.expect_change_roles().never();

    let (status, body) = call(
        ports,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/admin/users/{}/roles", UserId::generate()))
            .insert_header(bearer())
            .set_json(json!({ "items": [item] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("message").and_then(Value::as_str), Some(message));
}

#[rstest]
#[case::role_id(json!({ "role_id": "0192f1a4-5b6c-7d8e-9f01-23456789abcd", "action": "add" }))]
#[case::id(json!({ "id": "0192f1a4-5b6c-7d8e-9f01-23456789abcd", "action": "add" }))]
fn role_change_items_accept_either_id_field(#[case] item: Value) {
    let item: RoleChangeItemRequest = serde_json::from_value(item).expect("item parses");
    assert_eq!(item.role_id, "0192f1a4-5b6c-7d8e-9f01-23456789abcd");
}

#[rstest]
fn partial_update_keeps_omitted_fields_empty() {
    let changes = UserChanges::try_from(UpdateUserRequest {
        username: Some("grace".into()),
        ..UpdateUserRequest::default()
    })
    .expect("valid changes");
    assert_eq!(changes.username.map(String::from).as_deref(), Some("grace"));
    assert!(changes.email.is_none());
    assert!(changes.password.is_none());
}

#[rstest]
fn invalid_partial_update_is_rejected() {
    let err = UserChanges::try_from(UpdateUserRequest {
        email: Some("nope".into()),
        ..UpdateUserRequest::default()
    })
    .expect_err("invalid email");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
