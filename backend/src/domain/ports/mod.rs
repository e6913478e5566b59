//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod analytics_query;
mod analytics_repository;
mod audit_log;
mod login_service;
mod password_hasher;
mod refresh_token_repository;
mod submission_repository;
mod submissions_command;
mod submissions_query;
mod token_issuer;
mod user_repository;
mod users_command;
mod users_query;

pub use account_service::AccountService;
#[cfg(test)]
pub use account_service::MockAccountService;
pub use analytics_query::AnalyticsQuery;
#[cfg(test)]
pub use analytics_query::MockAnalyticsQuery;
#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
pub use analytics_repository::{AnalyticsRepository, AnalyticsRepositoryError};
#[cfg(test)]
pub use audit_log::MockAuditLog;
pub use audit_log::{AuditLog, AuditLogError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{AuthSession, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use refresh_token_repository::MockRefreshTokenRepository;
pub use refresh_token_repository::{RefreshTokenRepository, RefreshTokenRepositoryError};
#[cfg(test)]
pub use submission_repository::MockSubmissionRepository;
pub use submission_repository::{SubmissionRepository, SubmissionRepositoryError};
#[cfg(test)]
pub use submissions_command::MockSubmissionsCommand;
pub use submissions_command::SubmissionsCommand;
#[cfg(test)]
pub use submissions_query::MockSubmissionsQuery;
pub use submissions_query::{SubmissionExport, SubmissionsQuery};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenIssuer, TokenIssuerError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{NewAccount, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

#[cfg(test)]
mod tests;
