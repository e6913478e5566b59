//! Handler tests for account administration.

use actix_web::http::{Method, StatusCode};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::test_support::{account, fixture_timestamp};
use crate::domain::{UserId, UserSummary};
use crate::inbound::http::test_utils::{MockPorts, authenticated, bearer, test_app};

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

async fn send(ports: MockPorts, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let mut request = actix_test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header(bearer());
    if let Some(body) = body {
        request = request.set_json(body);
    }
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[actix_web::test]
async fn list_returns_summaries_in_camel_case() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports.users.expect_list_users().returning(|_| {
        let agent = account(Role::User, "agent@example.com");
        Ok(vec![UserSummary {
            id: agent.id,
            email: agent.email,
            role: agent.role,
            force_password_reset: true,
            last_login: None,
            created_at: fixture_timestamp(),
            created_by: Some("admin@example.com".to_owned()),
        }])
    });

    let (status, body) = send(ports, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let first = &body[0];
    assert_eq!(first["email"], "agent@example.com");
    assert_eq!(first["forcePasswordReset"], true);
    assert_eq!(first["createdBy"], "admin@example.com");
    assert_eq!(first["lastLogin"], Value::Null);
}

#[actix_web::test]
async fn gated_reviewer_cannot_list_users() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, true);
    ports.users.expect_list_users().never();

    let (status, body) = send(ports, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["details"]["forceReset"], true);
}

#[actix_web::test]
async fn create_returns_201_with_identity() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .users_command
        .expect_create_user()
        .withf(|_, account| {
            account.email.as_ref() == "new.agent@example.com"
                && account.role == Role::User
                && account.temporary_password.expose() == "Welcome1"
        })
        .times(1)
        .returning(|_, new_account| {
            let mut created = account(new_account.role, new_account.email.as_ref());
            created.force_password_reset = true;
            Ok(created.identity())
        });

    let (status, body) = send(
        ports,
        Method::POST,
        "/users",
        Some(json!({ "email": "New.Agent@example.com", "role": "user", "tempPassword": "Welcome1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], "new.agent@example.com");
    assert_eq!(body["user"]["forcePasswordReset"], true);
}

#[rstest]
#[case(
    json!({ "email": "not-an-email", "role": "user", "tempPassword": "Welcome1" }),
    ValidationExpectation { message: "Valid email required", field: "email", code: "invalid_email" }
)]
#[case(
    json!({ "email": "a@example.com", "role": "ceo", "tempPassword": "Welcome1" }),
    ValidationExpectation { message: "Role must be user or admin", field: "role", code: "invalid_role" }
)]
#[case(
    json!({ "email": "a@example.com", "role": "user", "tempPassword": "abc" }),
    ValidationExpectation {
        message: "Temporary password must be at least 6 characters",
        field: "tempPassword",
        code: "temporary_password_too_short",
    }
)]
#[case(
    json!({ "email": "a@example.com", "tempPassword": "Welcome1" }),
    ValidationExpectation { message: "role is required", field: "role", code: "missing_field" }
)]
#[actix_web::test]
async fn create_rejects_invalid_payloads(
    #[case] payload: Value,
    #[case] expected: ValidationExpectation<'_>,
) {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Ceo, false);
    ports.users_command.expect_create_user().never();

    let (status, body) = send(ports, Method::POST, "/users", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], expected.message);
    assert_eq!(body["details"]["field"], expected.field);
    assert_eq!(body["details"]["code"], expected.code);
}

#[actix_web::test]
async fn duplicate_email_is_a_bad_request() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .users_command
        .expect_create_user()
        .returning(|_, _| Err(Error::invalid_request("Email already exists")));

    let (status, body) = send(
        ports,
        Method::POST,
        "/users",
        Some(json!({ "email": "a@example.com", "role": "user", "tempPassword": "Welcome1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");
}

#[actix_web::test]
async fn reset_password_targets_path_id() {
    let target = UserId::random();
    let uri = format!("/users/{target}/reset-password");
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .users_command
        .expect_reset_password()
        .withf(move |_, id, password| *id == target && password.expose() == "Welcome2")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let (status, body) = send(
        ports,
        Method::PATCH,
        &uri,
        Some(json!({ "tempPassword": "Welcome2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset successfully");
}

#[actix_web::test]
async fn malformed_path_id_is_rejected() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Ceo, false);
    ports.users_command.expect_delete_user().never();

    let (status, body) = send(ports, Method::DELETE, "/users/42", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_uuid");
    assert_eq!(body["details"]["value"], "42");
}

#[actix_web::test]
async fn change_role_forwards_domain_refusal() {
    let target = UserId::random();
    let uri = format!("/users/{target}/role");
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .users_command
        .expect_change_role()
        .withf(|_, _, role| *role == Role::Admin)
        .returning(|_, _, _| Err(Error::forbidden("Insufficient permissions")));

    let (status, body) = send(ports, Method::PATCH, &uri, Some(json!({ "role": "admin" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions");
}

#[actix_web::test]
async fn delete_confirms_removal() {
    let target = UserId::random();
    let uri = format!("/users/{target}");
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Ceo, false);
    ports
        .users_command
        .expect_delete_user()
        .withf(move |_, id| *id == target)
        .times(1)
        .returning(|_, _| Ok(()));

    let (status, body) = send(ports, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
}
