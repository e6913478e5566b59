//! Contract coverage for port error types.

use super::*;
use rstest::rstest;

#[rstest]
#[case(
    UserPersistenceError::connection("refused").to_string(),
    "user repository connection failed: refused"
)]
#[case(
    UserPersistenceError::duplicate_email("a@example.com").to_string(),
    "email already registered: a@example.com"
)]
#[case(
    RefreshTokenRepositoryError::query("deadlock").to_string(),
    "refresh token repository query failed: deadlock"
)]
#[case(
    SubmissionRepositoryError::connection("timeout").to_string(),
    "submission repository connection failed: timeout"
)]
#[case(
    AnalyticsRepositoryError::query("syntax").to_string(),
    "analytics query failed: syntax"
)]
#[case(AuditLogError::query("full").to_string(), "audit log write failed: full")]
#[case(
    PasswordHashError::hashing("bad params").to_string(),
    "password hashing failed: bad params"
)]
#[case(
    TokenIssuerError::signing("short key").to_string(),
    "access token signing failed: short key"
)]
fn port_errors_render_context(#[case] rendered: String, #[case] expected: &str) {
    assert_eq!(rendered, expected);
}

#[rstest]
fn duplicate_email_is_distinct_from_query_failures() {
    let duplicate = UserPersistenceError::duplicate_email("a@example.com");
    assert_ne!(duplicate, UserPersistenceError::query("a@example.com"));
    assert!(matches!(
        duplicate,
        UserPersistenceError::DuplicateEmail { ref email } if email == "a@example.com"
    ));
}
