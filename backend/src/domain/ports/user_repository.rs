//! Port abstraction for user account persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, Error, Role, UserAccount, UserId, UserSummary, UsersScope};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

impl From<UserPersistenceError> for Error {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { email } => {
                Error::conflict(format!("email already registered: {email}"))
            }
        }
    }
}

/// Port for reading and mutating user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch an account by normalised email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Insert a new account.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// taken.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// List accounts visible within `scope`, newest first.
    async fn list(&self, scope: UsersScope) -> Result<Vec<UserSummary>, UserPersistenceError>;

    /// Stamp a successful login.
    async fn record_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError>;

    /// Replace the password hash and set the force-reset flag.
    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &str,
        force_password_reset: bool,
    ) -> Result<(), UserPersistenceError>;

    /// Change the role of an account.
    async fn update_role(&self, id: &UserId, role: Role) -> Result<(), UserPersistenceError>;

    /// Delete an account. Returns whether a row was removed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
