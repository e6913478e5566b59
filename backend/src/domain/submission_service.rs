//! Submission filing, review, and export services.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use mockable::Clock;
use pagination::{PageMeta, PageRequest, Paginated};
use serde_json::json;
use tracing::info;

use crate::domain::audit::record_quietly;
use crate::domain::ports::{
    AuditLog, SubmissionExport, SubmissionRepository, SubmissionsCommand, SubmissionsQuery,
};
use crate::domain::{
    AuditAction, AuditEntry, AuthenticatedUser, Error, NewSubmission, SubmissionExportRow,
    SubmissionFilter, SubmissionId, SubmissionRecord, SubmissionSummary, SubmissionType,
    require_reviewer,
};

/// Column order of the CSV export.
pub const EXPORT_HEADER: [&str; 7] = [
    "id",
    "type",
    "submitted_at",
    "user_email",
    "area",
    "accompanied_by",
    "details",
];

/// Service implementing the submission driving ports.
#[derive(Clone)]
pub struct SubmissionService<S, A> {
    submissions: Arc<S>,
    audit: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<S, A> SubmissionService<S, A> {
    /// Create a new service with its repository, audit log, and clock.
    pub fn new(submissions: Arc<S>, audit: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            submissions,
            audit,
            clock,
        }
    }
}

/// Render export rows as CSV text with a header line.
pub fn render_csv(rows: &[SubmissionExportRow]) -> Result<String, Error> {
    let csv_error = |err: csv::Error| Error::internal(format!("csv export failed: {err}"));
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER).map_err(csv_error)?;
    for row in rows {
        let id = row.id.to_string();
        let submitted_at = row
            .submitted_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let details = row.details.to_string();
        writer
            .write_record([
                id.as_str(),
                row.submission_type.as_str(),
                submitted_at.as_str(),
                row.user_email.as_deref().unwrap_or_default(),
                row.area.as_str(),
                row.accompanied_by.as_deref().unwrap_or_default(),
                details.as_str(),
            ])
            .map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| Error::internal(format!("csv export failed: {err}")))?;
    String::from_utf8(bytes).map_err(|err| Error::internal(format!("csv export failed: {err}")))
}

#[async_trait]
impl<S, A> SubmissionsCommand for SubmissionService<S, A>
where
    S: SubmissionRepository,
    A: AuditLog,
{
    async fn create_submission(
        &self,
        actor: &AuthenticatedUser,
        submission: NewSubmission,
    ) -> Result<SubmissionId, Error> {
        let submission_type = submission.submission_type();
        let record = SubmissionRecord {
            id: SubmissionId::random(),
            submission_type,
            user_id: actor.id,
            user_email: Some(actor.email.clone()),
            area: submission.area,
            accompanied_by: submission.accompanied_by,
            submitted_at: self.clock.utc(),
            details: submission.details,
        };
        self.submissions.insert(&record).await?;

        record_quietly(
            self.audit.as_ref(),
            AuditEntry::new(
                AuditAction::SubmissionCreated,
                actor.id,
                json!({ "type": submission_type, "submissionId": record.id }),
            ),
        )
        .await;
        Ok(record.id)
    }
}

#[async_trait]
impl<S, A> SubmissionsQuery for SubmissionService<S, A>
where
    S: SubmissionRepository,
    A: AuditLog,
{
    async fn list_submissions(
        &self,
        actor: &AuthenticatedUser,
        filter: SubmissionFilter,
        page: PageRequest,
    ) -> Result<Paginated<SubmissionSummary>, Error> {
        require_reviewer(actor)?;
        let total = self.submissions.count(&filter).await?;
        let rows = self.submissions.list(&filter, page).await?;
        Ok(Paginated::new(rows, PageMeta::new(page, total)))
    }

    async fn get_submission(
        &self,
        actor: &AuthenticatedUser,
        submission_type: SubmissionType,
        id: SubmissionId,
    ) -> Result<SubmissionRecord, Error> {
        require_reviewer(actor)?;
        self.submissions
            .find(submission_type, &id)
            .await?
            .ok_or_else(|| Error::not_found("Submission not found"))
    }

    async fn list_areas(
        &self,
        _actor: &AuthenticatedUser,
        submission_type: Option<SubmissionType>,
    ) -> Result<Vec<String>, Error> {
        Ok(self.submissions.areas(submission_type).await?)
    }

    async fn export_submissions(
        &self,
        actor: &AuthenticatedUser,
        filter: SubmissionFilter,
    ) -> Result<SubmissionExport, Error> {
        require_reviewer(actor)?;
        let rows = self.submissions.export(&filter).await?;
        let csv = render_csv(&rows)?;
        let filename = format!(
            "submissions-{}.csv",
            self.clock.utc().format("%Y%m%d-%H%M%S")
        );

        record_quietly(
            self.audit.as_ref(),
            AuditEntry::new(
                AuditAction::SubmissionsExported,
                actor.id,
                json!({ "rows": rows.len() }),
            ),
        )
        .await;
        info!(rows = rows.len(), "submissions exported");
        Ok(SubmissionExport {
            filename,
            csv,
            rows: rows.len(),
        })
    }
}

#[cfg(test)]
#[path = "submission_service_tests.rs"]
mod tests;
