//! Session and self-service account use-cases.
//!
//! Implements [`LoginService`] and [`AccountService`] on top of the user and
//! refresh-token repositories. Refresh tokens are single use: every refresh
//! consumes the presented token and stores a replacement.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::audit::record_quietly;
use crate::domain::ports::{
    AccountService, AuditLog, AuthSession, LoginService, PasswordHasher, RefreshTokenRepository,
    TokenIssuer, UserRepository,
};
use crate::domain::{
    AuditAction, AuditEntry, AuthenticatedUser, Error, LoginCredentials, NewPassword,
    RefreshToken, UserAccount, UserProfile,
};

/// Credential collaborators shared by the session services.
#[derive(Clone)]
pub struct CredentialSupport {
    pub hasher: Arc<dyn PasswordHasher>,
    pub issuer: Arc<dyn TokenIssuer>,
    pub clock: Arc<dyn Clock>,
    /// Lifetime of a refresh token.
    pub refresh_ttl: Duration,
}

/// Service implementing login, refresh, and password self-service.
#[derive(Clone)]
pub struct AuthService<U, R, A> {
    users: Arc<U>,
    refresh_tokens: Arc<R>,
    audit: Arc<A>,
    credentials: CredentialSupport,
}

impl<U, R, A> AuthService<U, R, A> {
    /// Create a new service with its repositories and credential helpers.
    pub fn new(
        users: Arc<U>,
        refresh_tokens: Arc<R>,
        audit: Arc<A>,
        credentials: CredentialSupport,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            audit,
            credentials,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("Invalid credentials")
}

impl<U, R, A> AuthService<U, R, A>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    A: AuditLog,
{
    async fn open_session(
        &self,
        account: &UserAccount,
        now: DateTime<Utc>,
    ) -> Result<AuthSession, Error> {
        let access_token = self.credentials.issuer.issue(&account.id)?;
        let refresh_token = RefreshToken::generate();
        self.refresh_tokens
            .store(
                &account.id,
                &refresh_token.hash(),
                now + self.credentials.refresh_ttl,
            )
            .await?;
        Ok(AuthSession {
            access_token,
            refresh_token,
            user: account.identity(),
        })
    }

    async fn load_account(&self, user: &AuthenticatedUser) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(&user.id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn store_password(
        &self,
        user: &AuthenticatedUser,
        password: &NewPassword,
        action: AuditAction,
    ) -> Result<(), Error> {
        let hash = self.credentials.hasher.hash(password.expose()).await?;
        self.users.update_password(&user.id, &hash, false).await?;
        record_quietly(
            self.audit.as_ref(),
            AuditEntry::new(action, user.id, json!({})),
        )
        .await;
        Ok(())
    }
}

#[async_trait]
impl<U, R, A> LoginService for AuthService<U, R, A>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    A: AuditLog,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let account = self
            .users
            .find_by_email(credentials.email())
            .await?
            .ok_or_else(invalid_credentials)?;

        let verified = self
            .credentials
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await?;
        if !verified {
            record_quietly(
                self.audit.as_ref(),
                AuditEntry::new(
                    AuditAction::LoginFailed,
                    account.id,
                    json!({ "email": account.email }),
                ),
            )
            .await;
            return Err(invalid_credentials());
        }

        let now = self.credentials.clock.utc();
        self.users.record_login(&account.id, now).await?;
        self.refresh_tokens
            .purge_expired_for_user(&account.id, now)
            .await?;
        let session = self.open_session(&account, now).await?;

        record_quietly(
            self.audit.as_ref(),
            AuditEntry::new(
                AuditAction::LoginSuccess,
                account.id,
                json!({ "email": account.email }),
            ),
        )
        .await;
        debug!(user_id = %account.id, "login succeeded");
        Ok(session)
    }

    async fn refresh(&self, token: Option<RefreshToken>) -> Result<AuthSession, Error> {
        let token = token.ok_or_else(|| Error::unauthorized("Refresh token required"))?;
        let now = self.credentials.clock.utc();
        let user_id = self
            .refresh_tokens
            .consume(&token.hash(), now)
            .await?
            .ok_or_else(|| Error::unauthorized("Invalid or expired refresh token"))?;
        let account = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("User not found"))?;
        self.open_session(&account, now).await
    }

    async fn logout(
        &self,
        user: &AuthenticatedUser,
        token: Option<RefreshToken>,
    ) -> Result<(), Error> {
        if let Some(token) = token {
            self.refresh_tokens.revoke(&token.hash()).await?;
        }
        record_quietly(
            self.audit.as_ref(),
            AuditEntry::new(AuditAction::Logout, user.id, json!({})),
        )
        .await;
        Ok(())
    }

    async fn authenticate(&self, bearer: &str) -> Result<AuthenticatedUser, Error> {
        let user_id = self.credentials.issuer.verify(bearer)?;
        let account = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("User not found"))?;
        Ok(AuthenticatedUser::from(&account))
    }
}

#[async_trait]
impl<U, R, A> AccountService for AuthService<U, R, A>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    A: AuditLog,
{
    async fn force_reset(
        &self,
        user: &AuthenticatedUser,
        password: NewPassword,
    ) -> Result<(), Error> {
        self.store_password(user, &password, AuditAction::PasswordForceReset)
            .await
    }

    async fn change_password(
        &self,
        user: &AuthenticatedUser,
        current_password: &str,
        password: NewPassword,
    ) -> Result<(), Error> {
        let account = self.load_account(user).await?;
        let verified = self
            .credentials
            .hasher
            .verify(current_password, &account.password_hash)
            .await?;
        if !verified {
            return Err(Error::invalid_request("Current password is incorrect"));
        }
        self.store_password(user, &password, AuditAction::PasswordReset)
            .await
    }

    async fn profile(&self, user: &AuthenticatedUser) -> Result<UserProfile, Error> {
        Ok(self.load_account(user).await?.profile())
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
