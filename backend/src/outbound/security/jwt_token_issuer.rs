//! HS256 JSON Web Token implementation of the [`TokenIssuer`] port.
//!
//! Claims are `{sub, iat, exp}`. Expiry is checked against the injected
//! clock rather than the system time so tests can move time forward.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenIssuer, TokenIssuerError};
use crate::domain::{AccessToken, TokenVerificationError, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    /// Issuer for `secret` producing tokens valid for `ttl`.
    pub fn new(secret: &Zeroizing<String>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenIssuerError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenIssuerError::signing(err.to_string()))?;
        Ok(AccessToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenVerificationError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|_| TokenVerificationError::Invalid)?;
        if self.clock.utc().timestamp() >= data.claims.exp {
            return Err(TokenVerificationError::Expired);
        }
        UserId::new(&data.claims.sub).map_err(|_| TokenVerificationError::Invalid)
    }
}
