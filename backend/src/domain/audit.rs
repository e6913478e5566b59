//! Audit trail entries for security-relevant actions.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::UserId;
use super::ports::AuditLog;

/// Actions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    LoginSuccess,
    LoginFailed,
    Logout,
    PasswordForceReset,
    PasswordReset,
    PasswordResetByAdmin,
    UserCreated,
    RoleChanged,
    UserDeleted,
    SubmissionCreated,
    SubmissionsExported,
}

impl AuditAction {
    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Logout => "LOGOUT",
            Self::PasswordForceReset => "PASSWORD_FORCE_RESET",
            Self::PasswordReset => "PASSWORD_RESET",
            Self::PasswordResetByAdmin => "PASSWORD_RESET_BY_ADMIN",
            Self::UserCreated => "USER_CREATED",
            Self::RoleChanged => "ROLE_CHANGED",
            Self::UserDeleted => "USER_DELETED",
            Self::SubmissionCreated => "SUBMISSION_CREATED",
            Self::SubmissionsExported => "SUBMISSIONS_EXPORTED",
        }
    }
}

/// One audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub user_id: Option<UserId>,
    pub meta: Value,
}

impl AuditEntry {
    /// Entry attributed to `user_id` with structured metadata.
    pub fn new(action: AuditAction, user_id: UserId, meta: Value) -> Self {
        Self {
            action,
            user_id: Some(user_id),
            meta,
        }
    }
}

/// Append `entry`, logging instead of failing when the store rejects it.
pub(crate) async fn record_quietly<A>(audit: &A, entry: AuditEntry)
where
    A: AuditLog + ?Sized,
{
    if let Err(error) = audit.record(&entry).await {
        warn!(action = entry.action.as_str(), %error, "audit write failed");
    }
}
