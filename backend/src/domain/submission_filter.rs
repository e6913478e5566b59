//! Filters shared by the submissions listing, export, and analytics.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::json;

use super::{Error, SubmissionType, UserId};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation errors for filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValidationError {
    InvalidDate { field: &'static str },
    InvertedRange,
    InvalidUser,
}

impl fmt::Display for FilterValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate { field } => write!(f, "{field} must be a date in YYYY-MM-DD format"),
            Self::InvertedRange => write!(f, "from must not be after to"),
            Self::InvalidUser => write!(f, "user must be a valid user id"),
        }
    }
}

impl std::error::Error for FilterValidationError {}

impl From<FilterValidationError> for Error {
    fn from(value: FilterValidationError) -> Self {
        let (field, code) = match value {
            FilterValidationError::InvalidDate { field } => (field, "invalid_date"),
            FilterValidationError::InvertedRange => ("from", "inverted_range"),
            FilterValidationError::InvalidUser => ("user", "invalid_uuid"),
        };
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": field,
            "code": code,
        }))
    }
}

/// Inclusive UTC window built from calendar dates.
///
/// `from` starts at midnight and `to` covers the whole of its day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse optional `YYYY-MM-DD` bounds.
    ///
    /// # Examples
    /// ```
    /// use field_reports::domain::DateRange;
    ///
    /// let range = DateRange::parse(Some("2025-03-01"), Some("2025-03-01")).unwrap();
    /// assert!(range.from().unwrap() < range.to().unwrap());
    /// assert!(DateRange::parse(Some("2025-03-02"), Some("2025-03-01")).is_err());
    /// ```
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, FilterValidationError> {
        let from_day = parse_day(from, "from")?;
        let to_day = parse_day(to, "to")?;
        if matches!((from_day, to_day), (Some(start), Some(end)) if start > end) {
            return Err(FilterValidationError::InvertedRange);
        }
        Ok(Self::days(from_day, to_day))
    }

    /// Range covering whole calendar days.
    pub fn days(first: Option<NaiveDate>, last: Option<NaiveDate>) -> Self {
        Self {
            from: first.map(|day| day.and_time(NaiveTime::MIN).and_utc()),
            to: last.map(end_of_day),
        }
    }

    /// Unbounded range.
    pub const fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Inclusive lower bound.
    pub const fn from(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    /// Inclusive upper bound.
    pub const fn to(&self) -> Option<DateTime<Utc>> {
        self.to
    }
}

fn parse_day(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<NaiveDate>, FilterValidationError> {
    match value.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FilterValidationError::InvalidDate { field }),
    }
}

fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    day.and_time(last_milli).and_utc()
}

/// Listing and export filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub submission_type: Option<SubmissionType>,
    pub area: Option<String>,
    pub user_id: Option<UserId>,
    pub range: DateRange,
}

impl SubmissionFilter {
    /// Build a filter from raw query values.
    pub fn parse(
        submission_type: Option<&str>,
        area: Option<&str>,
        user: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Self, Error> {
        let submission_type = non_empty(submission_type)
            .map(str::parse::<SubmissionType>)
            .transpose()?;
        let user_id = non_empty(user)
            .map(|raw| UserId::new(raw).map_err(|_| FilterValidationError::InvalidUser))
            .transpose()?;
        Ok(Self {
            submission_type,
            area: non_empty(area).map(str::to_owned),
            user_id,
            range: DateRange::parse(from, to)?,
        })
    }

    /// Tables the query must read.
    pub fn types(&self) -> Vec<SubmissionType> {
        self.submission_type
            .map_or_else(|| SubmissionType::ALL.to_vec(), |kind| vec![kind])
    }

    /// `ILIKE` pattern for the area substring match, with wildcards escaped.
    pub fn area_pattern(&self) -> Option<String> {
        self.area.as_deref().map(|area| {
            let escaped = area
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|raw| !raw.is_empty())
}
