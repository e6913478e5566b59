//! Dashboard aggregates over all submission types.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;

use crate::domain::ports::{AnalyticsQuery, AnalyticsRepository};
use crate::domain::{
    AnalyticsSummary, AuthenticatedUser, ChartData, CountBucket, DateRange, Error, MonthlyChart,
    ReportYear, SubmissionType, TopLimit, require_reviewer,
};

/// Service implementing [`AnalyticsQuery`].
#[derive(Clone)]
pub struct AnalyticsService<R> {
    analytics: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AnalyticsService<R> {
    /// Create a new service with the aggregate repository and a clock.
    pub fn new(analytics: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { analytics, clock }
    }
}

fn with_type_label(bucket: CountBucket) -> CountBucket {
    let key = bucket
        .key
        .parse::<SubmissionType>()
        .map_or(bucket.key, |kind| kind.label().to_owned());
    CountBucket {
        key,
        count: bucket.count,
    }
}

#[async_trait]
impl<R> AnalyticsQuery for AnalyticsService<R>
where
    R: AnalyticsRepository,
{
    async fn by_type(
        &self,
        actor: &AuthenticatedUser,
        range: DateRange,
    ) -> Result<ChartData, Error> {
        require_reviewer(actor)?;
        let buckets = self.analytics.count_by_type(&range).await?;
        Ok(buckets.into_iter().map(with_type_label).collect())
    }

    async fn by_area(
        &self,
        actor: &AuthenticatedUser,
        range: DateRange,
        limit: TopLimit,
    ) -> Result<ChartData, Error> {
        require_reviewer(actor)?;
        Ok(self
            .analytics
            .count_by_area(&range, limit)
            .await?
            .into_iter()
            .collect())
    }

    async fn by_user(
        &self,
        actor: &AuthenticatedUser,
        range: DateRange,
        limit: TopLimit,
    ) -> Result<ChartData, Error> {
        require_reviewer(actor)?;
        Ok(self
            .analytics
            .count_by_user(&range, limit)
            .await?
            .into_iter()
            .collect())
    }

    async fn by_month(
        &self,
        actor: &AuthenticatedUser,
        year: Option<i32>,
    ) -> Result<MonthlyChart, Error> {
        require_reviewer(actor)?;
        let year = ReportYear::new(year, self.clock.utc())?;
        let counts = self.analytics.count_by_month(year).await?;
        Ok(MonthlyChart::from_counts(year, counts))
    }

    async fn summary(&self, actor: &AuthenticatedUser) -> Result<AnalyticsSummary, Error> {
        require_reviewer(actor)?;
        let today = self.clock.utc().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);

        let total_submissions = self
            .analytics
            .count_submissions(&DateRange::unbounded())
            .await?;
        let total_users = self.analytics.count_field_users().await?;
        let today_submissions = self
            .analytics
            .count_submissions(&DateRange::days(Some(today), Some(today)))
            .await?;
        let this_month_submissions = self
            .analytics
            .count_submissions(&DateRange::days(Some(month_start), Some(today)))
            .await?;

        Ok(AnalyticsSummary {
            total_submissions,
            total_users,
            today_submissions,
            this_month_submissions,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for chart shaping and access control.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockAnalyticsRepository;
    use crate::domain::test_support::{actor, fixture_clock};
    use crate::domain::Role;
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn service(repo: MockAnalyticsRepository) -> AnalyticsService<MockAnalyticsRepository> {
        AnalyticsService::new(Arc::new(repo), fixture_clock())
    }

    fn bucket(key: &str, count: i64) -> CountBucket {
        CountBucket {
            key: key.to_owned(),
            count,
        }
    }

    #[tokio::test]
    async fn by_type_uses_display_labels() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_count_by_type()
            .returning(|_| Ok(vec![bucket("ooh", 9), bucket("depo", 2)]));

        let chart = service(repo)
            .by_type(&actor(Role::Admin), DateRange::unbounded())
            .await
            .expect("chart");
        assert_eq!(chart.labels, vec!["OOH", "Depo"]);
        assert_eq!(chart.data, vec![9, 2]);
    }

    #[tokio::test]
    async fn by_month_defaults_to_clock_year() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_count_by_month()
            .withf(|year| year.get() == 2025)
            .returning(|_| Ok(vec![(3, 12)]));

        let chart = service(repo)
            .by_month(&actor(Role::Ceo), None)
            .await
            .expect("chart");
        assert_eq!(chart.year, 2025);
        assert_eq!(chart.data[2], 12);
        assert_eq!(chart.data.iter().sum::<i64>(), 12);
    }

    #[tokio::test]
    async fn by_month_rejects_out_of_range_year() {
        let err = service(MockAnalyticsRepository::new())
            .by_month(&actor(Role::Ceo), Some(1999))
            .await
            .expect_err("year out of range");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn summary_counts_today_and_month() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).expect("date");
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_count_submissions()
            .with(eq(DateRange::unbounded()))
            .returning(|_| Ok(120));
        repo.expect_count_submissions()
            .with(eq(DateRange::days(Some(day(14)), Some(day(14)))))
            .returning(|_| Ok(4));
        repo.expect_count_submissions()
            .with(eq(DateRange::days(Some(day(1)), Some(day(14)))))
            .returning(|_| Ok(37));
        repo.expect_count_field_users().returning(|| Ok(18));

        let summary = service(repo)
            .summary(&actor(Role::Admin))
            .await
            .expect("summary");
        assert_eq!(
            summary,
            AnalyticsSummary {
                total_submissions: 120,
                total_users: 18,
                today_submissions: 4,
                this_month_submissions: 37,
            }
        );
    }

    #[rstest]
    #[case(Role::User)]
    #[tokio::test]
    async fn field_staff_cannot_view_analytics(#[case] role: Role) {
        let err = service(MockAnalyticsRepository::new())
            .summary(&actor(role))
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
