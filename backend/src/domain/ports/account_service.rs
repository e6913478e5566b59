//! Driving port for self-service account operations.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, NewPassword, UserProfile};

/// Domain use-case port for the caller's own account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Replace a temporary password and lift the force-reset gate.
    async fn force_reset(&self, user: &AuthenticatedUser, password: NewPassword)
    -> Result<(), Error>;

    /// Change the password after re-checking the current one.
    async fn change_password(
        &self,
        user: &AuthenticatedUser,
        current_password: &str,
        password: NewPassword,
    ) -> Result<(), Error>;

    /// Profile of the caller.
    async fn profile(&self, user: &AuthenticatedUser) -> Result<UserProfile, Error>;
}
