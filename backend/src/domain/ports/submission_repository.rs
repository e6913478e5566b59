//! Port for the six submission tables.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    Error, SubmissionExportRow, SubmissionFilter, SubmissionId, SubmissionRecord,
    SubmissionSummary, SubmissionType,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by submission repository adapters.
    pub enum SubmissionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "submission repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "submission repository query failed: {message}",
    }
}

impl From<SubmissionRepositoryError> for Error {
    fn from(value: SubmissionRepositoryError) -> Self {
        match value {
            SubmissionRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("submission repository unavailable: {message}"))
            }
            SubmissionRepositoryError::Query { message } => {
                Error::internal(format!("submission repository error: {message}"))
            }
        }
    }
}

/// Port for writing and searching submissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Insert into the table for the record's type.
    async fn insert(&self, record: &SubmissionRecord) -> Result<(), SubmissionRepositoryError>;

    /// Load one submission with the submitter's email.
    async fn find(
        &self,
        submission_type: SubmissionType,
        id: &SubmissionId,
    ) -> Result<Option<SubmissionRecord>, SubmissionRepositoryError>;

    /// One page of matching submissions, newest first.
    async fn list(
        &self,
        filter: &SubmissionFilter,
        page: PageRequest,
    ) -> Result<Vec<SubmissionSummary>, SubmissionRepositoryError>;

    /// Number of submissions matching `filter`.
    async fn count(&self, filter: &SubmissionFilter) -> Result<u64, SubmissionRepositoryError>;

    /// Every matching submission with its type-specific columns.
    async fn export(
        &self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionExportRow>, SubmissionRepositoryError>;

    /// Distinct non-empty areas, sorted ascending.
    async fn areas(
        &self,
        submission_type: Option<SubmissionType>,
    ) -> Result<Vec<String>, SubmissionRepositoryError>;
}
