//! Chart payloads and parameters for the analytics endpoints.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::Error;

/// Default number of bars in a top-N chart.
pub const DEFAULT_TOP_LIMIT: u32 = 10;
/// Largest accepted top-N limit.
pub const MAX_TOP_LIMIT: u32 = 50;
/// Earliest reportable year.
pub const MIN_REPORT_YEAR: i32 = 2020;
/// Latest reportable year.
pub const MAX_REPORT_YEAR: i32 = 2100;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Invalid analytics parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsValidationError {
    LimitOutOfRange,
    YearOutOfRange,
}

impl fmt::Display for AnalyticsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitOutOfRange => write!(f, "limit must be between 1 and {MAX_TOP_LIMIT}"),
            Self::YearOutOfRange => write!(
                f,
                "year must be between {MIN_REPORT_YEAR} and {MAX_REPORT_YEAR}"
            ),
        }
    }
}

impl std::error::Error for AnalyticsValidationError {}

impl From<AnalyticsValidationError> for Error {
    fn from(value: AnalyticsValidationError) -> Self {
        let field = match value {
            AnalyticsValidationError::LimitOutOfRange => "limit",
            AnalyticsValidationError::YearOutOfRange => "year",
        };
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": field,
            "code": "out_of_range",
        }))
    }
}

/// Number of entries in a top-N chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopLimit(u32);

impl TopLimit {
    /// Validate an optional limit, defaulting to [`DEFAULT_TOP_LIMIT`].
    pub fn new(limit: Option<u32>) -> Result<Self, AnalyticsValidationError> {
        match limit.unwrap_or(DEFAULT_TOP_LIMIT) {
            value @ 1..=MAX_TOP_LIMIT => Ok(Self(value)),
            _ => Err(AnalyticsValidationError::LimitOutOfRange),
        }
    }

    /// Limit as a SQL bind value.
    pub const fn get(self) -> i64 {
        self.0 as i64
    }
}

impl Default for TopLimit {
    fn default() -> Self {
        Self(DEFAULT_TOP_LIMIT)
    }
}

/// Calendar year for the monthly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportYear(i32);

impl ReportYear {
    /// Validate `year`, or fall back to the year of `now`.
    pub fn new(year: Option<i32>, now: DateTime<Utc>) -> Result<Self, AnalyticsValidationError> {
        match year.unwrap_or_else(|| now.year()) {
            value @ MIN_REPORT_YEAR..=MAX_REPORT_YEAR => Ok(Self(value)),
            _ => Err(AnalyticsValidationError::YearOutOfRange),
        }
    }

    /// Year value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// One aggregated bucket read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountBucket {
    pub key: String,
    pub count: i64,
}

/// Parallel label and value arrays for a bar or pie chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

impl FromIterator<CountBucket> for ChartData {
    fn from_iter<I: IntoIterator<Item = CountBucket>>(iter: I) -> Self {
        let (labels, data) = iter
            .into_iter()
            .map(|bucket| (bucket.key, bucket.count))
            .unzip();
        Self { labels, data }
    }
}

/// Submissions per month for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyChart {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
    pub year: i32,
}

impl MonthlyChart {
    /// Spread `(month, count)` pairs over all twelve months.
    ///
    /// Months outside `1..=12` are ignored and missing months count as zero.
    pub fn from_counts(year: ReportYear, counts: impl IntoIterator<Item = (u32, i64)>) -> Self {
        let mut data = vec![0_i64; MONTH_LABELS.len()];
        for (month, count) in counts {
            let slot = (month as usize)
                .checked_sub(1)
                .and_then(|index| data.get_mut(index));
            if let Some(slot) = slot {
                *slot = count;
            }
        }
        Self {
            labels: MONTH_LABELS.iter().map(|label| (*label).to_owned()).collect(),
            data,
            year: year.get(),
        }
    }
}

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_submissions: i64,
    pub total_users: i64,
    pub today_submissions: i64,
    pub this_month_submissions: i64,
}
