//! Port for single-use refresh token storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, RefreshTokenHash, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by refresh token stores.
    pub enum RefreshTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "refresh token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "refresh token repository query failed: {message}",
    }
}

impl From<RefreshTokenRepositoryError> for Error {
    fn from(value: RefreshTokenRepositoryError) -> Self {
        match value {
            RefreshTokenRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("refresh token repository unavailable: {message}"))
            }
            RefreshTokenRepositoryError::Query { message } => {
                Error::internal(format!("refresh token repository error: {message}"))
            }
        }
    }
}

/// Port for persisting refresh token digests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Store a digest for `user_id`.
    async fn store(
        &self,
        user_id: &UserId,
        token_hash: &RefreshTokenHash,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenRepositoryError>;

    /// Atomically remove an unexpired token and return its owner.
    ///
    /// Returns `None` when the token is unknown, expired, or already used.
    async fn consume(
        &self,
        token_hash: &RefreshTokenHash,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, RefreshTokenRepositoryError>;

    /// Remove a single token if present.
    async fn revoke(&self, token_hash: &RefreshTokenHash)
    -> Result<(), RefreshTokenRepositoryError>;

    /// Remove every token held by `user_id`.
    async fn revoke_all_for_user(&self, user_id: &UserId)
    -> Result<(), RefreshTokenRepositoryError>;

    /// Remove the expired tokens of `user_id`.
    async fn purge_expired_for_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), RefreshTokenRepositoryError>;
}
