//! Driving port for filing submissions.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, NewSubmission, SubmissionId};

/// Domain use-case port for recording field visits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionsCommand: Send + Sync {
    /// Store a validated submission on behalf of `actor`.
    async fn create_submission(
        &self,
        actor: &AuthenticatedUser,
        submission: NewSubmission,
    ) -> Result<SubmissionId, Error>;
}
