//! Port for signing and verifying access tokens.

use crate::domain::{AccessToken, Error, TokenVerificationError, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while signing a token.
    pub enum TokenIssuerError {
        /// The signer rejected the claims or key.
        Signing { message: String } => "access token signing failed: {message}",
    }
}

impl From<TokenIssuerError> for Error {
    fn from(value: TokenIssuerError) -> Self {
        match value {
            TokenIssuerError::Signing { message } => {
                Error::internal(format!("token issuer error: {message}"))
            }
        }
    }
}

/// Port for access token issuance.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenIssuerError>;

    /// Verify a bearer token and return its subject.
    fn verify(&self, token: &str) -> Result<UserId, TokenVerificationError>;
}
