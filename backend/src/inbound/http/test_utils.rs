//! Test helpers shared by HTTP handler tests.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockAccountService, MockAnalyticsQuery, MockLoginService, MockSubmissionsCommand,
    MockSubmissionsQuery, MockUsersCommand, MockUsersQuery,
};
use crate::domain::test_support::actor;
use crate::domain::{AuthenticatedUser, Role};

use super::api_routes;
use super::auth::login;
use super::cookies::RefreshCookie;
use super::state::{HttpState, HttpStatePorts};
use super::validation::{json_config, query_config};

/// Bearer token accepted by [`authenticated`].
pub(crate) const BEARER: &str = "test-access-token";

/// `Authorization` header carrying [`BEARER`].
pub(crate) fn bearer() -> (&'static str, String) {
    ("authorization", format!("Bearer {BEARER}"))
}

/// Mock driving ports; tests set expectations before building state.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub login: MockLoginService,
    pub account: MockAccountService,
    pub users: MockUsersQuery,
    pub users_command: MockUsersCommand,
    pub submissions: MockSubmissionsCommand,
    pub submissions_query: MockSubmissionsQuery,
    pub analytics: MockAnalyticsQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                login: Arc::new(self.login),
                account: Arc::new(self.account),
                users: Arc::new(self.users),
                users_command: Arc::new(self.users_command),
                submissions: Arc::new(self.submissions),
                submissions_query: Arc::new(self.submissions_query),
                analytics: Arc::new(self.analytics),
            },
            RefreshCookie::new(true, chrono::Duration::days(7)),
        )
    }
}

/// Accept [`BEARER`] as a caller holding `role`.
pub(crate) fn authenticated(
    login: &mut MockLoginService,
    role: Role,
    force_password_reset: bool,
) -> AuthenticatedUser {
    let user = AuthenticatedUser {
        force_password_reset,
        ..actor(role)
    };
    let returned = user.clone();
    login
        .expect_authenticate()
        .withf(|token| token == BEARER)
        .returning(move |_| Ok(returned.clone()));
    user
}

/// Application with every API route wired to `ports`.
pub(crate) fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .app_data(json_config())
        .app_data(query_config())
        .route("/auth/login", web::post().to(login))
        .configure(api_routes)
}
