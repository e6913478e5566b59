//! Driving port for login, token refresh, and bearer authentication.
//!
//! Inbound adapters call this port to establish and renew sessions without
//! knowing how accounts or tokens are stored. Handler tests substitute a mock.

use async_trait::async_trait;

use crate::domain::{
    AccessToken, AuthenticatedUser, Error, LoginCredentials, RefreshToken, UserIdentity,
};

/// Tokens and identity returned by a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: AccessToken,
    /// Rotated refresh token for the cookie.
    pub refresh_token: RefreshToken,
    pub user: UserIdentity,
}

/// Domain use-case port for session management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and open a session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Exchange a refresh token for a new session, consuming it.
    async fn refresh(&self, token: Option<RefreshToken>) -> Result<AuthSession, Error>;

    /// Close the session behind `token`, if any.
    async fn logout(
        &self,
        user: &AuthenticatedUser,
        token: Option<RefreshToken>,
    ) -> Result<(), Error>;

    /// Resolve a bearer token to the current account state.
    async fn authenticate(&self, bearer: &str) -> Result<AuthenticatedUser, Error>;
}
