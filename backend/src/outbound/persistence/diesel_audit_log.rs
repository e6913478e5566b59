//! PostgreSQL-backed [`AuditLog`].

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::AuditEntry;
use crate::domain::ports::{AuditLog, AuditLogError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewAuditLogRow;
use super::pool::DbPool;
use super::schema::audit_logs;

/// Appends to `audit_logs`.
#[derive(Clone)]
pub struct DieselAuditLog {
    pool: DbPool,
}

impl DieselAuditLog {
    /// Create an audit log over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for DieselAuditLog {
    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditLogError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, AuditLogError::connection))?;
        let row = NewAuditLogRow {
            action: entry.action.as_str(),
            user_id: entry.user_id.map(|id| *id.as_uuid()),
            meta: &entry.meta,
        };
        diesel::insert_into(audit_logs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, AuditLogError::query, AuditLogError::connection))
    }
}
