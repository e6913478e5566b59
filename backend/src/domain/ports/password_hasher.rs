//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not run.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

impl From<PasswordHashError> for Error {
    fn from(value: PasswordHashError) -> Self {
        match value {
            PasswordHashError::Hashing { message } => {
                Error::internal(format!("password hashing error: {message}"))
            }
        }
    }
}

/// Port for hashing and verifying passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` into a self-describing string.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored hash.
    ///
    /// Malformed hashes verify as `false`.
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, PasswordHashError>;
}
