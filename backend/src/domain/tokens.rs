//! Bearer and refresh token primitives.
//!
//! Access tokens are short-lived signed bearer tokens produced by a
//! [`TokenIssuer`](super::ports::TokenIssuer) adapter. Refresh tokens are
//! opaque random strings handed to the browser in an HTTP-only cookie; only
//! their SHA-256 digest is persisted, and each one is single use.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::Error;

/// Default lifetime of an access token in minutes.
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 15;
/// Default lifetime of a refresh token in days.
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Signed bearer token and its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Why a bearer token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenVerificationError {
    /// Signature was valid but the token is past its expiry.
    #[error("Token expired")]
    Expired,
    /// Token is malformed, tampered with, or signed with another key.
    #[error("Invalid token")]
    Invalid,
}

impl From<TokenVerificationError> for Error {
    fn from(value: TokenVerificationError) -> Self {
        Self::unauthorized(value.to_string())
    }
}

/// Opaque refresh token as presented by the client.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(Zeroizing<String>);

impl RefreshToken {
    /// Generate a new random token.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; REFRESH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Wrap a token read from a cookie.
    pub fn from_presented(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(raw)))
        }
    }

    /// Token value for the cookie.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Digest stored in the database.
    pub fn hash(&self) -> RefreshTokenHash {
        RefreshTokenHash(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshToken(***)")
    }
}

/// Lower-case hex SHA-256 digest of a refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefreshTokenHash(String);

impl RefreshTokenHash {
    /// Digest as stored.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
