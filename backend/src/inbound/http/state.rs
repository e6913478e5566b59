//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, AnalyticsQuery, LoginService, SubmissionsCommand, SubmissionsQuery,
    UsersCommand, UsersQuery,
};

use super::cookies::RefreshCookie;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub account: Arc<dyn AccountService>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub submissions: Arc<dyn SubmissionsCommand>,
    pub submissions_query: Arc<dyn SubmissionsQuery>,
    pub analytics: Arc<dyn AnalyticsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub account: Arc<dyn AccountService>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub submissions: Arc<dyn SubmissionsCommand>,
    pub submissions_query: Arc<dyn SubmissionsQuery>,
    pub analytics: Arc<dyn AnalyticsQuery>,
    /// Attributes of the refresh token cookie.
    pub refresh_cookie: RefreshCookie,
}

impl HttpState {
    /// Construct state from the ports bundle and cookie settings.
    pub fn new(ports: HttpStatePorts, refresh_cookie: RefreshCookie) -> Self {
        let HttpStatePorts {
            login,
            account,
            users,
            users_command,
            submissions,
            submissions_query,
            analytics,
        } = ports;
        Self {
            login,
            account,
            users,
            users_command,
            submissions,
            submissions_query,
            analytics,
            refresh_cookie,
        }
    }
}
