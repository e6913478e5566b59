//! Port for the append-only audit trail.

use async_trait::async_trait;

use crate::domain::AuditEntry;

use super::define_port_error;

define_port_error! {
    /// Errors raised by audit log adapters.
    pub enum AuditLogError {
        /// Repository connection could not be established.
        Connection { message: String } => "audit log connection failed: {message}",
        /// Insert failed.
        Query { message: String } => "audit log write failed: {message}",
    }
}

/// Port for recording security-relevant actions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append an entry.
    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditLogError>;
}
