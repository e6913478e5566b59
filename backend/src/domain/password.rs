//! Password policies for self-chosen and admin-issued passwords.
//!
//! Plaintext is held in [`Zeroizing`] buffers so it is wiped once hashed.

use std::fmt;

use serde_json::json;
use zeroize::Zeroizing;

use super::Error;

/// Minimum length of a password chosen by the account owner.
pub const NEW_PASSWORD_MIN: usize = 8;
/// Minimum length of a temporary password issued by a reviewer.
pub const TEMPORARY_PASSWORD_MIN: usize = 6;

/// Reasons a password fails policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPolicyError {
    TooShort,
    MissingUppercase,
    MissingDigit,
    TemporaryTooShort,
}

impl PasswordPolicyError {
    /// Stable code used in validation details.
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooShort => "password_too_short",
            Self::MissingUppercase => "password_missing_uppercase",
            Self::MissingDigit => "password_missing_digit",
            Self::TemporaryTooShort => "temporary_password_too_short",
        }
    }
}

impl fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(
                f,
                "Password must be at least {NEW_PASSWORD_MIN} characters"
            ),
            Self::MissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            Self::MissingDigit => write!(f, "Password must contain at least one number"),
            Self::TemporaryTooShort => write!(
                f,
                "Temporary password must be at least {TEMPORARY_PASSWORD_MIN} characters"
            ),
        }
    }
}

impl std::error::Error for PasswordPolicyError {}

impl From<PasswordPolicyError> for Error {
    fn from(value: PasswordPolicyError) -> Self {
        let field = match value {
            PasswordPolicyError::TemporaryTooShort => "tempPassword",
            _ => "newPassword",
        };
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": field,
            "code": value.code(),
        }))
    }
}

/// Password chosen by the account owner.
///
/// ## Invariants
/// - At least [`NEW_PASSWORD_MIN`] characters.
/// - Contains an ASCII uppercase letter and an ASCII digit.
///
/// # Examples
/// ```
/// use field_reports::domain::{NewPassword, PasswordPolicyError};
///
/// assert!(NewPassword::new("Reporter2024").is_ok());
/// assert_eq!(
///     NewPassword::new("reporter2024").unwrap_err(),
///     PasswordPolicyError::MissingUppercase
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Check `raw` against the policy.
    pub fn new(raw: &str) -> Result<Self, PasswordPolicyError> {
        if raw.chars().count() < NEW_PASSWORD_MIN {
            return Err(PasswordPolicyError::TooShort);
        }
        if !raw.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !raw.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(***)")
    }
}

/// Password issued by a reviewer when creating or resetting an account.
///
/// The holder must replace it through the force-reset flow on first use.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryPassword(Zeroizing<String>);

impl TemporaryPassword {
    /// Check `raw` against the temporary password policy.
    pub fn new(raw: &str) -> Result<Self, PasswordPolicyError> {
        if raw.chars().count() < TEMPORARY_PASSWORD_MIN {
            return Err(PasswordPolicyError::TemporaryTooShort);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for TemporaryPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TemporaryPassword(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Short1", PasswordPolicyError::TooShort)]
    #[case("alllowercase1", PasswordPolicyError::MissingUppercase)]
    #[case("NoDigitsHere", PasswordPolicyError::MissingDigit)]
    #[case("ÄÖÜäöü12", PasswordPolicyError::MissingUppercase)]
    fn new_password_policy_rejects(#[case] raw: &str, #[case] expected: PasswordPolicyError) {
        assert_eq!(NewPassword::new(raw).expect_err("policy violation"), expected);
    }

    #[rstest]
    #[case("Password1")]
    #[case("CEO@1234")]
    #[case("with spaces A9")]
    fn new_password_policy_accepts(#[case] raw: &str) {
        let password = NewPassword::new(raw).expect("policy satisfied");
        assert_eq!(password.expose(), raw);
    }

    #[rstest]
    #[case("12345", false)]
    #[case("123456", true)]
    #[case("temp-pass", true)]
    fn temporary_password_requires_six_characters(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(TemporaryPassword::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn debug_output_hides_plaintext() {
        let password = NewPassword::new("Secret123").expect("valid");
        assert!(!format!("{password:?}").contains("Secret123"));
    }

    #[rstest]
    fn messages_match_policy_limits() {
        assert_eq!(
            PasswordPolicyError::TooShort.to_string(),
            "Password must be at least 8 characters"
        );
        assert_eq!(
            PasswordPolicyError::TemporaryTooShort.to_string(),
            "Temporary password must be at least 6 characters"
        );
    }
}
