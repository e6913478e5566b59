//! Handler tests for the session endpoints.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::Duration;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::test_support::{account, fixture_timestamp};
use crate::domain::{AccessToken, RefreshToken, Role};
use crate::inbound::http::cookies::REFRESH_COOKIE;
use crate::inbound::http::test_utils::{MockPorts, authenticated, bearer, test_app};

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

fn session(refresh_token: &str) -> AuthSession {
    AuthSession {
        access_token: AccessToken {
            token: "signed.jwt.value".to_owned(),
            expires_at: fixture_timestamp() + Duration::minutes(15),
        },
        refresh_token: RefreshToken::from_presented(refresh_token).expect("non-empty token"),
        user: account(Role::User, "agent@example.com").identity(),
    }
}

async fn post_json(ports: MockPorts, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer())
        .set_json(&body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

fn refresh_cookie_of<B>(response: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == REFRESH_COOKIE)
        .map(Cookie::into_owned)
        .expect("refresh cookie set")
}

#[rstest]
#[case(
    json!({ "email": "  ", "password": "Reporter2024" }),
    ValidationExpectation { message: "Valid email required", field: "email", code: "invalid_email" }
)]
#[case(
    json!({ "email": "agent@example.com" }),
    ValidationExpectation { message: "Password required", field: "password", code: "empty_password" }
)]
#[actix_web::test]
async fn login_rejects_invalid_payloads(
    #[case] body: Value,
    #[case] expected: ValidationExpectation<'_>,
) {
    let mut ports = MockPorts::default();
    ports.login.expect_login().never();

    let (status, value) = post_json(ports, "/auth/login", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["message"], expected.message);
    assert_eq!(value["details"]["field"], expected.field);
    assert_eq!(value["details"]["code"], expected.code);
}

#[actix_web::test]
async fn login_sets_refresh_cookie_and_returns_token() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_login()
        .withf(|credentials| credentials.email().as_ref() == "agent@example.com")
        .times(1)
        .returning(|_| Ok(session("fresh-refresh")));

    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": " Agent@Example.com ", "password": "Reporter2024" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = refresh_cookie_of(&response);
    assert_eq!(cookie.value(), "fresh-refresh");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/auth"));

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["accessToken"], "signed.jwt.value");
    assert_eq!(body["user"]["email"], "agent@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["forcePasswordReset"], false);
    assert!(body.get("refreshToken").is_none());
}

#[actix_web::test]
async fn refresh_without_cookie_is_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_refresh()
        .withf(Option::is_none)
        .returning(|_| Err(Error::unauthorized("Refresh token required")));

    let (status, body) = post_json(ports, "/auth/refresh", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Refresh token required");
}

#[actix_web::test]
async fn refresh_rotates_cookie() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_refresh()
        .withf(|token| token.as_ref().map(RefreshToken::expose) == Some("old-refresh"))
        .times(1)
        .returning(|_| Ok(session("new-refresh")));

    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::post()
        .uri("/auth/refresh")
        .cookie(Cookie::new(REFRESH_COOKIE, "old-refresh"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(refresh_cookie_of(&response).value(), "new-refresh");
}

#[actix_web::test]
async fn logout_revokes_presented_token_and_clears_cookie() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::User, true);
    ports
        .login
        .expect_logout()
        .withf(|_, token| token.as_ref().map(RefreshToken::expose) == Some("current"))
        .times(1)
        .returning(|_, _| Ok(()));

    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer())
        .cookie(Cookie::new(REFRESH_COOKIE, "current"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = refresh_cookie_of(&response);
    assert_eq!(cookie.value(), "");
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO)
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Logged out successfully");
}

#[rstest]
#[case("short1A", "password_too_short")]
#[case("lowercase1", "password_missing_uppercase")]
#[case("NoDigitsHere", "password_missing_digit")]
#[actix_web::test]
async fn force_reset_enforces_policy(#[case] password: &str, #[case] code: &str) {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::User, true);
    ports.account.expect_force_reset().never();

    let (status, body) = post_json(
        ports,
        "/auth/force-reset",
        json!({ "newPassword": password }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "newPassword");
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn force_reset_is_open_to_gated_users() {
    let mut ports = MockPorts::default();
    let user = authenticated(&mut ports.login, Role::User, true);
    ports
        .account
        .expect_force_reset()
        .withf(move |caller, password| caller.id == user.id && password.expose() == "Reporter2024")
        .times(1)
        .returning(|_, _| Ok(()));

    let (status, body) = post_json(
        ports,
        "/auth/force-reset",
        json!({ "newPassword": "Reporter2024" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully");
}

#[actix_web::test]
async fn change_password_requires_current_password() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports.account.expect_change_password().never();

    let (status, body) = post_json(
        ports,
        "/auth/reset-password",
        json!({ "newPassword": "Reporter2024" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "currentPassword is required");
    assert_eq!(body["details"]["code"], "missing_field");
}

#[actix_web::test]
async fn change_password_surfaces_wrong_current_password() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .account
        .expect_change_password()
        .withf(|_, current, _| current == "Old1Password")
        .returning(|_, _, _| Err(Error::invalid_request("Current password is incorrect")));

    let (status, body) = post_json(
        ports,
        "/auth/reset-password",
        json!({ "currentPassword": "Old1Password", "newPassword": "Reporter2024" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Current password is incorrect");
}

#[actix_web::test]
async fn me_returns_camel_case_profile() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Ceo, true);
    ports
        .account
        .expect_profile()
        .returning(|_| Ok(account(Role::Ceo, "ceo@example.com").profile()));

    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "ceo@example.com");
    assert_eq!(body["role"], "ceo");
    assert!(body.get("forcePasswordReset").is_some());
    assert!(body.get("createdAt").is_some());
    assert!(body.get("passwordHash").is_none());
}
