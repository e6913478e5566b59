//! PostgreSQL-backed [`SubmissionRepository`].
//!
//! Inserts and single-record reads use the typed table for the submission's
//! category. Listing, counting, export, and area lookups read across tables
//! through [`ReportQuery`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{SubmissionRepository, SubmissionRepositoryError};
use crate::domain::{
    SubmissionExportRow, SubmissionFilter, SubmissionId, SubmissionRecord, SubmissionSummary,
    SubmissionType, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    AreaRow, CountRow, DealerRow, DepoRow, ExportRow, OohRow, ReaderRow, StallRow, SubmissionRow,
    SummaryRow, VendorRow,
};
use super::pool::{DbPool, PoolError};
use super::report_query::ReportQuery;
use super::schema::{
    submissions_dealer, submissions_depo, submissions_ooh, submissions_reader, submissions_stall,
    submissions_vendor, users,
};

/// Diesel implementation of the submission store.
#[derive(Clone)]
pub struct DieselSubmissionRepository {
    pool: DbPool,
}

impl DieselSubmissionRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> SubmissionRepositoryError {
    map_pool_error(error, SubmissionRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> SubmissionRepositoryError {
    map_diesel_error(
        error,
        SubmissionRepositoryError::query,
        SubmissionRepositoryError::connection,
    )
}

fn stored_type(raw: &str) -> Result<SubmissionType, SubmissionRepositoryError> {
    raw.parse()
        .map_err(|_| SubmissionRepositoryError::query(format!("stored submission type: {raw}")))
}

fn row_to_summary(row: SummaryRow) -> Result<SubmissionSummary, SubmissionRepositoryError> {
    Ok(SubmissionSummary {
        id: SubmissionId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        area: row.area,
        submitted_at: row.submitted_at,
        submission_type: stored_type(&row.submission_type)?,
        user_email: row.user_email,
    })
}

fn row_to_export(row: ExportRow) -> Result<SubmissionExportRow, SubmissionRepositoryError> {
    Ok(SubmissionExportRow {
        id: SubmissionId::from_uuid(row.id),
        submission_type: stored_type(&row.submission_type)?,
        submitted_at: row.submitted_at,
        user_email: row.user_email,
        area: row.area,
        accompanied_by: row.accompanied_by,
        details: row.details,
    })
}

/// Load one row of `$table` joined to its submitter.
macro_rules! find_typed {
    ($conn:expr, $table:ident, $row:ty, $variant:ident, $id:expr) => {{
        $table::table
            .left_join(users::table)
            .filter($table::id.eq($id))
            .select((<$row>::as_select(), users::email.nullable()))
            .first::<($row, Option<String>)>($conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(|(row, email)| (SubmissionRow::$variant(row), email))
    }};
}

#[async_trait]
impl SubmissionRepository for DieselSubmissionRepository {
    async fn insert(&self, record: &SubmissionRecord) -> Result<(), SubmissionRepositoryError> {
        let row = SubmissionRow::from_record(record)
            .map_err(|err| SubmissionRepositoryError::query(err.to_string()))?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let inserted = match row {
            SubmissionRow::Depo(row) => {
                diesel::insert_into(submissions_depo::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
            }
            SubmissionRow::Vendor(row) => {
                diesel::insert_into(submissions_vendor::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
            }
            SubmissionRow::Dealer(row) => {
                diesel::insert_into(submissions_dealer::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
            }
            SubmissionRow::Stall(row) => {
                diesel::insert_into(submissions_stall::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
            }
            SubmissionRow::Reader(row) => {
                diesel::insert_into(submissions_reader::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
            }
            SubmissionRow::Ooh(row) => {
                diesel::insert_into(submissions_ooh::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
            }
        };
        inserted.map_err(diesel_error)?;
        debug!(submission_type = %record.submission_type, id = %record.id, "submission stored");
        Ok(())
    }

    async fn find(
        &self,
        submission_type: SubmissionType,
        id: &SubmissionId,
    ) -> Result<Option<SubmissionRecord>, SubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let id = *id.as_uuid();
        let found = match submission_type {
            SubmissionType::Depo => find_typed!(&mut conn, submissions_depo, DepoRow, Depo, id),
            SubmissionType::Vendor => {
                find_typed!(&mut conn, submissions_vendor, VendorRow, Vendor, id)
            }
            SubmissionType::Dealer => {
                find_typed!(&mut conn, submissions_dealer, DealerRow, Dealer, id)
            }
            SubmissionType::Stall => find_typed!(&mut conn, submissions_stall, StallRow, Stall, id),
            SubmissionType::Reader => {
                find_typed!(&mut conn, submissions_reader, ReaderRow, Reader, id)
            }
            SubmissionType::Ooh => find_typed!(&mut conn, submissions_ooh, OohRow, Ooh, id),
        };
        found
            .map(|(row, email)| row.into_record(email))
            .transpose()
            .map_err(SubmissionRepositoryError::query)
    }

    async fn list(
        &self,
        filter: &SubmissionFilter,
        page: PageRequest,
    ) -> Result<Vec<SubmissionSummary>, SubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        ReportQuery::list(filter, page)
            .into_boxed()
            .load::<SummaryRow>(&mut conn)
            .await
            .map_err(diesel_error)?
            .into_iter()
            .map(row_to_summary)
            .collect()
    }

    async fn count(&self, filter: &SubmissionFilter) -> Result<u64, SubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = ReportQuery::count(filter)
            .into_boxed()
            .get_result::<CountRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(row.total).unwrap_or_default())
    }

    async fn export(
        &self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionExportRow>, SubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        ReportQuery::export(filter)
            .into_boxed()
            .load::<ExportRow>(&mut conn)
            .await
            .map_err(diesel_error)?
            .into_iter()
            .map(row_to_export)
            .collect()
    }

    async fn areas(
        &self,
        submission_type: Option<SubmissionType>,
    ) -> Result<Vec<String>, SubmissionRepositoryError> {
        let types = submission_type.map_or_else(|| SubmissionType::ALL.to_vec(), |kind| vec![kind]);
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = ReportQuery::areas(&types)
            .into_boxed()
            .load::<AreaRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(|row| row.area).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    #[rstest]
    fn unknown_stored_type_is_a_query_error() {
        let err = stored_type("kiosk").expect_err("unknown type");
        assert!(matches!(err, SubmissionRepositoryError::Query { .. }));
    }

    #[rstest]
    fn export_rows_keep_stored_details() {
        let row = ExportRow {
            id: Uuid::new_v4(),
            submission_type: "reader".to_owned(),
            submitted_at: chrono::Utc::now(),
            user_email: None,
            area: "Borivali".to_owned(),
            accompanied_by: None,
            details: json!({ "reader_name": "Asha" }),
        };
        let exported = row_to_export(row).expect("export row");
        assert_eq!(exported.submission_type, SubmissionType::Reader);
        assert_eq!(exported.details["reader_name"], "Asha");
    }
}
