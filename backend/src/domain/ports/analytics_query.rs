//! Driving port for dashboard charts.

use async_trait::async_trait;

use crate::domain::{
    AnalyticsSummary, AuthenticatedUser, ChartData, DateRange, Error, MonthlyChart, TopLimit,
};

/// Domain use-case port for analytics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsQuery: Send + Sync {
    /// Submissions per type.
    async fn by_type(&self, actor: &AuthenticatedUser, range: DateRange)
    -> Result<ChartData, Error>;

    /// Busiest areas.
    async fn by_area(
        &self,
        actor: &AuthenticatedUser,
        range: DateRange,
        limit: TopLimit,
    ) -> Result<ChartData, Error>;

    /// Most active submitters.
    async fn by_user(
        &self,
        actor: &AuthenticatedUser,
        range: DateRange,
        limit: TopLimit,
    ) -> Result<ChartData, Error>;

    /// Submissions per month of `year`, or of the current year.
    async fn by_month(
        &self,
        actor: &AuthenticatedUser,
        year: Option<i32>,
    ) -> Result<MonthlyChart, Error>;

    /// Headline counters.
    async fn summary(&self, actor: &AuthenticatedUser) -> Result<AnalyticsSummary, Error>;
}
