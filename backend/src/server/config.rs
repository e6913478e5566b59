//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::Duration;
use zeroize::Zeroizing;

use field_reports::domain::{DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_REFRESH_TOKEN_DAYS};
use field_reports::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) jwt_secret: Zeroizing<String>,
    pub(crate) access_token_ttl: Duration,
    pub(crate) refresh_token_ttl: Duration,
    pub(crate) cookie_secure: bool,
    pub(crate) login_rate_limit: u32,
    pub(crate) login_rate_window: Duration,
    pub(crate) trust_forwarded_for: bool,
    pub(crate) frontend_origin: String,
}

impl ServerConfig {
    /// Configuration with default token lifetimes, a secure cookie, a login
    /// limit of ten attempts per fifteen minutes keyed on the TCP peer, and
    /// `http://localhost:3000` as the allowed frontend origin.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, jwt_secret: Zeroizing<String>) -> Self {
        Self {
            bind_addr,
            db_pool,
            jwt_secret,
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_MINUTES),
            refresh_token_ttl: Duration::days(DEFAULT_REFRESH_TOKEN_DAYS),
            cookie_secure: true,
            login_rate_limit: 10,
            login_rate_window: Duration::minutes(15),
            trust_forwarded_for: false,
            frontend_origin: "http://localhost:3000".to_owned(),
        }
    }

    /// Override the access and refresh token lifetimes.
    #[must_use]
    pub fn with_token_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_token_ttl = access;
        self.refresh_token_ttl = refresh;
        self
    }

    /// Send the refresh cookie over plain HTTP too when `false`.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Allow `limit` login attempts per client address every `window`.
    #[must_use]
    pub fn with_login_rate_limit(mut self, limit: u32, window: Duration) -> Self {
        self.login_rate_limit = limit;
        self.login_rate_window = window;
        self
    }

    /// Key the login limiter on forwarded client addresses.
    #[must_use]
    pub fn with_trusted_forwarding(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Origin allowed to call the API with credentials.
    #[must_use]
    pub fn with_frontend_origin(mut self, origin: impl Into<String>) -> Self {
        self.frontend_origin = origin.into();
        self
    }
}
