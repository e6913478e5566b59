//! Domain primitives, services, and ports.
//!
//! Purpose: Define strongly typed entities and use-cases for the field
//! reporting backend. Inbound adapters talk to the services through the
//! driving ports in [`ports`]; the services reach storage and credential
//! primitives through the driven ports in the same module.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - UserAccount, Role, Email: account identity and role.
//! - NewSubmission, SubmissionRecord: field visit reports.
//! - AuthService, UserAdminService, SubmissionService, AnalyticsService:
//!   driving port implementations.

pub mod access;
pub mod analytics;
mod analytics_service;
pub mod audit;
pub mod auth;
mod auth_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod submission;
pub mod submission_filter;
mod submission_service;
pub mod tokens;
mod trace_id;
pub mod user;
mod user_admin_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::access::{
    AuthenticatedUser, UsersScope, ensure_password_current, require_reviewer, require_role,
};
pub use self::analytics::{
    AnalyticsSummary, AnalyticsValidationError, ChartData, CountBucket, MonthlyChart,
    ReportYear, TopLimit,
};
pub use self::analytics_service::AnalyticsService;
pub use self::audit::{AuditAction, AuditEntry};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::auth_service::{AuthService, CredentialSupport};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::password::{NewPassword, PasswordPolicyError, TemporaryPassword};
pub use self::submission::{
    CollectionMode, CollectionVisit, NewSubmission, NewspaperCount, SubmissionDetails,
    SubmissionDraft, SubmissionExportRow, SubmissionId, SubmissionRecord, SubmissionSummary,
    SubmissionType, SubmissionValidationError,
};
pub use self::submission_filter::{DateRange, FilterValidationError, SubmissionFilter};
pub use self::submission_service::{EXPORT_HEADER, SubmissionService, render_csv};
pub use self::tokens::{
    AccessToken, DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_REFRESH_TOKEN_DAYS, RefreshToken,
    RefreshTokenHash, TokenVerificationError,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, Role, UserAccount, UserId, UserIdentity, UserProfile, UserSummary,
    UserValidationError,
};
pub use self::user_admin_service::UserAdminService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use field_reports::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
