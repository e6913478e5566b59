//! Driving port for account management by reviewers.

use async_trait::async_trait;

use crate::domain::{
    AuthenticatedUser, Email, Error, Role, TemporaryPassword, UserId, UserIdentity,
};

/// Validated request to open an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: Email,
    pub role: Role,
    pub temporary_password: TemporaryPassword,
}

/// Domain use-case port for creating and administering accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Open an account that must change its password on first login.
    async fn create_user(
        &self,
        actor: &AuthenticatedUser,
        account: NewAccount,
    ) -> Result<UserIdentity, Error>;

    /// Issue a temporary password to `target`.
    async fn reset_password(
        &self,
        actor: &AuthenticatedUser,
        target: &UserId,
        password: TemporaryPassword,
    ) -> Result<(), Error>;

    /// Grant `role` to `target`.
    async fn change_role(
        &self,
        actor: &AuthenticatedUser,
        target: &UserId,
        role: Role,
    ) -> Result<(), Error>;

    /// Remove `target` and everything it owns.
    async fn delete_user(&self, actor: &AuthenticatedUser, target: &UserId) -> Result<(), Error>;
}
