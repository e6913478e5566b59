//! Port for aggregate counts across every submission table.

use async_trait::async_trait;

use crate::domain::{CountBucket, DateRange, Error, ReportYear, TopLimit};

use super::define_port_error;

define_port_error! {
    /// Errors raised by analytics adapters.
    pub enum AnalyticsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "analytics connection failed: {message}",
        /// Aggregate query failed.
        Query { message: String } => "analytics query failed: {message}",
    }
}

impl From<AnalyticsRepositoryError> for Error {
    fn from(value: AnalyticsRepositoryError) -> Self {
        match value {
            AnalyticsRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("analytics repository unavailable: {message}"))
            }
            AnalyticsRepositoryError::Query { message } => {
                Error::internal(format!("analytics repository error: {message}"))
            }
        }
    }
}

/// Port for chart aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Counts keyed by submission type name, largest first.
    async fn count_by_type(
        &self,
        range: &DateRange,
    ) -> Result<Vec<CountBucket>, AnalyticsRepositoryError>;

    /// Counts keyed by area, largest first.
    async fn count_by_area(
        &self,
        range: &DateRange,
        limit: TopLimit,
    ) -> Result<Vec<CountBucket>, AnalyticsRepositoryError>;

    /// Counts keyed by submitter email, largest first.
    async fn count_by_user(
        &self,
        range: &DateRange,
        limit: TopLimit,
    ) -> Result<Vec<CountBucket>, AnalyticsRepositoryError>;

    /// `(month, count)` pairs for months with submissions in `year`.
    async fn count_by_month(
        &self,
        year: ReportYear,
    ) -> Result<Vec<(u32, i64)>, AnalyticsRepositoryError>;

    /// Total submissions inside `range`.
    async fn count_submissions(&self, range: &DateRange)
    -> Result<i64, AnalyticsRepositoryError>;

    /// Number of field staff accounts.
    async fn count_field_users(&self) -> Result<i64, AnalyticsRepositoryError>;
}
