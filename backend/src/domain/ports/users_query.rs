//! Driving port for account listings.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, UserSummary};

/// Domain use-case port for listing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Accounts visible to `actor`, newest first.
    async fn list_users(&self, actor: &AuthenticatedUser) -> Result<Vec<UserSummary>, Error>;
}
