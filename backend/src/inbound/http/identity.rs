//! Bearer token extractors.
//!
//! [`CurrentUser`] resolves the caller and applies the force-password-reset
//! gate. [`SessionUser`] skips the gate and is reserved for the routes a user
//! with a temporary password still needs: changing the password, reading the
//! profile, and logging out.

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::{AuthenticatedUser, Error, ensure_password_current};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

/// Authenticated caller, whether or not a password reset is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser(pub AuthenticatedUser);

impl SessionUser {
    /// Unwrap the authenticated identity.
    pub fn into_inner(self) -> AuthenticatedUser {
        self.0
    }
}

impl Deref for SessionUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for SessionUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token.ok_or_else(|| Error::unauthorized("Access token required"))?;
            let Some(state) = state else {
                error!("HTTP state missing from application data");
                return Err(Error::internal("HTTP state not configured"));
            };
            state.login.authenticate(&token).await.map(Self)
        })
    }
}

/// Authenticated caller whose password is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub AuthenticatedUser);

impl CurrentUser {
    /// Unwrap the authenticated identity.
    pub fn into_inner(self) -> AuthenticatedUser {
        self.0
    }
}

impl Deref for CurrentUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionUser::from_request(req, payload);
        Box::pin(async move {
            let SessionUser(user) = session.await?;
            ensure_password_current(&user)?;
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{BEARER, MockPorts, authenticated, bearer};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn whoami(user: CurrentUser) -> HttpResponse {
        HttpResponse::Ok().body(user.email.clone())
    }

    async fn whoami_ungated(user: SessionUser) -> HttpResponse {
        HttpResponse::Ok().body(user.into_inner().email)
    }

    async fn call(
        ports: MockPorts,
        header: Option<(&'static str, String)>,
        path: &str,
    ) -> (StatusCode, Vec<u8>) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .route("/gated", web::get().to(whoami))
                .route("/ungated", web::get().to(whoami_ungated)),
        )
        .await;
        let mut req = test::TestRequest::get().uri(path);
        if let Some(header) = header {
            req = req.insert_header(header);
        }
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, test::read_body(res).await.to_vec())
    }

    #[rstest]
    #[case(None)]
    #[case(Some(("authorization", "Basic abc".to_owned())))]
    #[case(Some(("authorization", "Bearer   ".to_owned())))]
    #[actix_web::test]
    async fn missing_bearer_is_rejected(#[case] header: Option<(&'static str, String)>) {
        let (status, body) = call(MockPorts::default(), header, "/gated").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(body["message"], "Access token required");
    }

    #[actix_web::test]
    async fn verified_bearer_resolves_user() {
        let mut ports = MockPorts::default();
        authenticated(&mut ports.login, Role::User, false);
        let (status, body) = call(ports, Some(bearer()), "/gated").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"user@example.com");
    }

    #[actix_web::test]
    async fn token_errors_pass_through() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_authenticate()
            .withf(|token| token == BEARER)
            .returning(|_| Err(Error::unauthorized("Token expired")));
        let (status, body) = call(ports, Some(bearer()), "/ungated").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(body["message"], "Token expired");
    }

    #[rstest]
    #[case("/gated", StatusCode::FORBIDDEN)]
    #[case("/ungated", StatusCode::OK)]
    #[actix_web::test]
    async fn pending_reset_is_gated(#[case] path: &str, #[case] expected: StatusCode) {
        let mut ports = MockPorts::default();
        authenticated(&mut ports.login, Role::User, true);
        let (status, body) = call(ports, Some(bearer()), path).await;
        assert_eq!(status, expected);
        if expected == StatusCode::FORBIDDEN {
            let body: Value = serde_json::from_slice(&body).expect("json body");
            assert_eq!(body["message"], "Password reset required");
            assert_eq!(body["details"]["forceReset"], true);
        }
    }
}
