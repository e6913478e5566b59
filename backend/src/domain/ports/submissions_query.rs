//! Driving port for reviewing and exporting submissions.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{
    AuthenticatedUser, Error, SubmissionFilter, SubmissionId, SubmissionRecord,
    SubmissionSummary, SubmissionType,
};

/// Rendered CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionExport {
    pub filename: String,
    pub csv: String,
    pub rows: usize,
}

/// Domain use-case port for submission review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionsQuery: Send + Sync {
    /// One page of submissions matching `filter`.
    async fn list_submissions(
        &self,
        actor: &AuthenticatedUser,
        filter: SubmissionFilter,
        page: PageRequest,
    ) -> Result<Paginated<SubmissionSummary>, Error>;

    /// A single submission.
    async fn get_submission(
        &self,
        actor: &AuthenticatedUser,
        submission_type: SubmissionType,
        id: SubmissionId,
    ) -> Result<SubmissionRecord, Error>;

    /// Areas used so far, for filter drop-downs.
    async fn list_areas(
        &self,
        actor: &AuthenticatedUser,
        submission_type: Option<SubmissionType>,
    ) -> Result<Vec<String>, Error>;

    /// Every submission matching `filter` as CSV.
    async fn export_submissions(
        &self,
        actor: &AuthenticatedUser,
        filter: SubmissionFilter,
    ) -> Result<SubmissionExport, Error>;
}
