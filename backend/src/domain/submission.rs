//! Field visit submissions.
//!
//! Six fixed submission types share a common envelope (who, where, when) and
//! carry a type-specific payload. Each type is stored in its own table; see
//! [`SubmissionType::table`].
//!
//! Inbound payloads arrive as a loosely typed [`SubmissionDraft`] and are
//! validated into a [`NewSubmission`] before any port is called.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Error, UserId};

/// Maximum length of short text fields such as names and areas.
pub const SHORT_TEXT_MAX: usize = 255;
/// Maximum length of free-text notes.
pub const LONG_TEXT_MAX: usize = 5000;
/// Maximum length of a phone number.
pub const PHONE_MAX: usize = 20;

/// The six report categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    Depo,
    Vendor,
    Dealer,
    Stall,
    Reader,
    Ooh,
}

impl SubmissionType {
    /// Every type, in display order.
    pub const ALL: [Self; 6] = [
        Self::Depo,
        Self::Vendor,
        Self::Dealer,
        Self::Stall,
        Self::Reader,
        Self::Ooh,
    ];

    /// Wire and stored name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Depo => "depo",
            Self::Vendor => "vendor",
            Self::Dealer => "dealer",
            Self::Stall => "stall",
            Self::Reader => "reader",
            Self::Ooh => "ooh",
        }
    }

    /// Backing table name.
    pub const fn table(self) -> &'static str {
        match self {
            Self::Depo => "submissions_depo",
            Self::Vendor => "submissions_vendor",
            Self::Dealer => "submissions_dealer",
            Self::Stall => "submissions_stall",
            Self::Reader => "submissions_reader",
            Self::Ooh => "submissions_ooh",
        }
    }

    /// Chart label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Depo => "Depo",
            Self::Vendor => "Vendor",
            Self::Dealer => "Dealer",
            Self::Stall => "Stall",
            Self::Reader => "Reader",
            Self::Ooh => "OOH",
        }
    }

    /// Whether visits of this type record who accompanied the field agent.
    pub const fn supports_accompanied_by(self) -> bool {
        matches!(self, Self::Depo | Self::Vendor | Self::Dealer | Self::Stall)
    }
}

impl FromStr for SubmissionType {
    type Err = SubmissionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(SubmissionValidationError::InvalidType)
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    /// Generate a new identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a dealer or stall paid their dues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CollectionMode {
    #[serde(rename = "DD")]
    Dd,
    Cash,
    Cheque,
    #[serde(rename = "Online Pay")]
    OnlinePay,
}

impl CollectionMode {
    /// Stored and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dd => "DD",
            Self::Cash => "Cash",
            Self::Cheque => "Cheque",
            Self::OnlinePay => "Online Pay",
        }
    }
}

impl FromStr for CollectionMode {
    type Err = SubmissionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DD" => Ok(Self::Dd),
            "Cash" => Ok(Self::Cash),
            "Cheque" => Ok(Self::Cheque),
            "Online Pay" => Ok(Self::OnlinePay),
            _ => Err(SubmissionValidationError::InvalidCollectionMode),
        }
    }
}

/// Copies of a competing newspaper seen at a dealer or stall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewspaperCount {
    pub name: String,
    #[serde(default)]
    pub number: String,
}

/// Validation failures for submission payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionValidationError {
    InvalidType,
    MissingField { field: &'static str },
    FieldTooLong { field: &'static str, max: usize },
    InvalidAmount { field: &'static str },
    InvalidCollectionMode,
    EmptyList { field: &'static str },
}

impl SubmissionValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::InvalidType => "type",
            Self::InvalidCollectionMode => "collectionMode",
            Self::MissingField { field }
            | Self::FieldTooLong { field, .. }
            | Self::InvalidAmount { field }
            | Self::EmptyList { field } => field,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_submission_type",
            Self::MissingField { .. } => "missing_field",
            Self::FieldTooLong { .. } => "field_too_long",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidCollectionMode => "invalid_collection_mode",
            Self::EmptyList { .. } => "empty_list",
        }
    }
}

impl fmt::Display for SubmissionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidType => write!(f, "Invalid submission type"),
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::InvalidAmount { field } => write!(f, "{field} must be a non-negative number"),
            Self::InvalidCollectionMode => write!(
                f,
                "collectionMode must be one of DD, Cash, Cheque, Online Pay"
            ),
            Self::EmptyList { field } => write!(f, "{field} must include at least one entry"),
        }
    }
}

impl std::error::Error for SubmissionValidationError {}

impl From<SubmissionValidationError> for Error {
    fn from(value: SubmissionValidationError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

/// Dealer and stall collection visit.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionVisit {
    /// Dealer name or stall owner.
    pub party: String,
    pub dues_amount: Option<f64>,
    pub collection_mode: Option<CollectionMode>,
    pub collection_amount: Option<f64>,
    pub competition_newspapers: Vec<NewspaperCount>,
    pub discussion: Option<String>,
    pub outcome: Option<String>,
}

/// Type-specific submission payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionDetails {
    Depo {
        person_met: String,
        competition_activity: String,
        discussion: Option<String>,
        outcome: Option<String>,
    },
    Vendor {
        vendor_name: String,
        phone: String,
        outcome: Option<String>,
    },
    Dealer(CollectionVisit),
    Stall(CollectionVisit),
    Reader {
        reader_name: String,
        contact_details: String,
        present_reading: Vec<String>,
        readers_feedback: Option<String>,
    },
    Ooh {
        segment: String,
        contact_person: String,
        existing_newspaper: Vec<String>,
        feedback_suggestion: Option<String>,
    },
}

impl SubmissionDetails {
    /// Category of this payload.
    pub const fn submission_type(&self) -> SubmissionType {
        match self {
            Self::Depo { .. } => SubmissionType::Depo,
            Self::Vendor { .. } => SubmissionType::Vendor,
            Self::Dealer(_) => SubmissionType::Dealer,
            Self::Stall(_) => SubmissionType::Stall,
            Self::Reader { .. } => SubmissionType::Reader,
            Self::Ooh { .. } => SubmissionType::Ooh,
        }
    }

    /// Payload fields keyed by their camelCase wire names.
    pub fn fields(&self) -> Map<String, Value> {
        let value = match self {
            Self::Depo {
                person_met,
                competition_activity,
                discussion,
                outcome,
            } => json!({
                "personMet": person_met,
                "competitionActivity": competition_activity,
                "discussion": discussion,
                "outcome": outcome,
            }),
            Self::Vendor {
                vendor_name,
                phone,
                outcome,
            } => json!({
                "vendorName": vendor_name,
                "phone": phone,
                "outcome": outcome,
            }),
            Self::Dealer(visit) => collection_fields("dealerName", visit),
            Self::Stall(visit) => collection_fields("stallOwner", visit),
            Self::Reader {
                reader_name,
                contact_details,
                present_reading,
                readers_feedback,
            } => json!({
                "readerName": reader_name,
                "contactDetails": contact_details,
                "presentReading": present_reading,
                "readersFeedback": readers_feedback,
            }),
            Self::Ooh {
                segment,
                contact_person,
                existing_newspaper,
                feedback_suggestion,
            } => json!({
                "segment": segment,
                "contactPerson": contact_person,
                "existingNewspaper": existing_newspaper,
                "feedbackSuggestion": feedback_suggestion,
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn collection_fields(party_key: &str, visit: &CollectionVisit) -> Value {
    let mut value = json!({
        "duesAmount": visit.dues_amount,
        "collectionMode": visit.collection_mode.map(CollectionMode::as_str),
        "collectionAmount": visit.collection_amount,
        "competitionNewspapers": visit.competition_newspapers,
        "discussion": visit.discussion,
        "outcome": visit.outcome,
    });
    if let Value::Object(map) = &mut value {
        map.insert(party_key.to_owned(), Value::String(visit.party.clone()));
    }
    value
}

impl Serialize for SubmissionDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in &fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Loosely typed submission payload as posted by the client.
///
/// Every field is optional here; [`NewSubmission::from_draft`] enforces the
/// per-type requirements.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDraft {
    #[serde(rename = "type")]
    #[schema(example = "dealer")]
    pub submission_type: Option<String>,
    pub area: Option<String>,
    pub accompanied_by: Option<String>,
    pub person_met: Option<String>,
    pub competition_activity: Option<String>,
    pub discussion: Option<String>,
    pub outcome: Option<String>,
    pub vendor_name: Option<String>,
    pub phone: Option<String>,
    pub dealer_name: Option<String>,
    pub stall_owner: Option<String>,
    pub dues_amount: Option<f64>,
    pub collection_mode: Option<String>,
    pub collection_amount: Option<f64>,
    pub competition_newspapers: Option<Vec<NewspaperCount>>,
    pub reader_name: Option<String>,
    pub contact_details: Option<String>,
    pub present_reading: Option<Vec<String>>,
    pub readers_feedback: Option<String>,
    pub segment: Option<String>,
    pub contact_person: Option<String>,
    pub existing_newspaper: Option<Vec<String>>,
    pub feedback_suggestion: Option<String>,
}

/// Validated submission ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub area: String,
    pub accompanied_by: Option<String>,
    pub details: SubmissionDetails,
}

type FieldResult<T> = Result<T, SubmissionValidationError>;

fn required(value: Option<String>, field: &'static str, max: usize) -> FieldResult<String> {
    optional(value, field, max)?.ok_or(SubmissionValidationError::MissingField { field })
}

fn optional(value: Option<String>, field: &'static str, max: usize) -> FieldResult<Option<String>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(SubmissionValidationError::FieldTooLong { field, max });
    }
    Ok(Some(trimmed.to_owned()))
}

fn amount(value: Option<f64>, field: &'static str) -> FieldResult<Option<f64>> {
    match value {
        Some(number) if !number.is_finite() || number < 0.0 => {
            Err(SubmissionValidationError::InvalidAmount { field })
        }
        other => Ok(other),
    }
}

fn required_list(value: Option<Vec<String>>, field: &'static str) -> FieldResult<Vec<String>> {
    let entries = value
        .unwrap_or_default()
        .into_iter()
        .map(|entry| optional(Some(entry), field, SHORT_TEXT_MAX))
        .collect::<FieldResult<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    if entries.is_empty() {
        return Err(SubmissionValidationError::EmptyList { field });
    }
    Ok(entries)
}

fn newspapers(value: Option<Vec<NewspaperCount>>) -> FieldResult<Vec<NewspaperCount>> {
    const FIELD: &str = "competitionNewspapers";
    value
        .unwrap_or_default()
        .into_iter()
        .filter_map(|paper| {
            optional(Some(paper.name), FIELD, SHORT_TEXT_MAX)
                .and_then(|name| {
                    let number = optional(Some(paper.number), FIELD, SHORT_TEXT_MAX)?;
                    Ok(name.map(|name| NewspaperCount {
                        name,
                        number: number.unwrap_or_default(),
                    }))
                })
                .transpose()
        })
        .collect()
}

fn collection_mode(value: Option<String>) -> FieldResult<Option<CollectionMode>> {
    optional(value, "collectionMode", SHORT_TEXT_MAX)?
        .map(|raw| raw.parse())
        .transpose()
}

fn collection_visit(
    party: Option<String>,
    party_field: &'static str,
    draft: &mut SubmissionDraft,
) -> FieldResult<CollectionVisit> {
    Ok(CollectionVisit {
        party: required(party, party_field, SHORT_TEXT_MAX)?,
        dues_amount: amount(draft.dues_amount, "duesAmount")?,
        collection_mode: collection_mode(draft.collection_mode.take())?,
        collection_amount: amount(draft.collection_amount, "collectionAmount")?,
        competition_newspapers: newspapers(draft.competition_newspapers.take())?,
        discussion: optional(draft.discussion.take(), "discussion", LONG_TEXT_MAX)?,
        outcome: optional(draft.outcome.take(), "outcome", LONG_TEXT_MAX)?,
    })
}

impl NewSubmission {
    /// Validate a client draft.
    ///
    /// # Examples
    /// ```
    /// use field_reports::domain::{NewSubmission, SubmissionDraft, SubmissionType};
    ///
    /// let draft = SubmissionDraft {
    ///     submission_type: Some("vendor".into()),
    ///     area: Some("Andheri".into()),
    ///     vendor_name: Some("Sharma News".into()),
    ///     phone: Some("9820000000".into()),
    ///     ..SubmissionDraft::default()
    /// };
    /// let submission = NewSubmission::from_draft(draft).unwrap();
    /// assert_eq!(submission.details.submission_type(), SubmissionType::Vendor);
    /// ```
    pub fn from_draft(mut draft: SubmissionDraft) -> Result<Self, SubmissionValidationError> {
        let kind: SubmissionType = draft
            .submission_type
            .take()
            .ok_or(SubmissionValidationError::InvalidType)?
            .trim()
            .parse()?;
        let area = required(draft.area.take(), "area", SHORT_TEXT_MAX)?;
        let accompanied_by = if kind.supports_accompanied_by() {
            optional(draft.accompanied_by.take(), "accompaniedBy", SHORT_TEXT_MAX)?
        } else {
            None
        };

        let details = match kind {
            SubmissionType::Depo => SubmissionDetails::Depo {
                person_met: required(draft.person_met.take(), "personMet", SHORT_TEXT_MAX)?,
                competition_activity: required(
                    draft.competition_activity.take(),
                    "competitionActivity",
                    LONG_TEXT_MAX,
                )?,
                discussion: optional(draft.discussion.take(), "discussion", LONG_TEXT_MAX)?,
                outcome: optional(draft.outcome.take(), "outcome", LONG_TEXT_MAX)?,
            },
            SubmissionType::Vendor => SubmissionDetails::Vendor {
                vendor_name: required(draft.vendor_name.take(), "vendorName", SHORT_TEXT_MAX)?,
                phone: required(draft.phone.take(), "phone", PHONE_MAX)?,
                outcome: optional(draft.outcome.take(), "outcome", LONG_TEXT_MAX)?,
            },
            SubmissionType::Dealer => {
                let party = draft.dealer_name.take();
                SubmissionDetails::Dealer(collection_visit(party, "dealerName", &mut draft)?)
            }
            SubmissionType::Stall => {
                let party = draft.stall_owner.take();
                SubmissionDetails::Stall(collection_visit(party, "stallOwner", &mut draft)?)
            }
            SubmissionType::Reader => SubmissionDetails::Reader {
                reader_name: required(draft.reader_name.take(), "readerName", SHORT_TEXT_MAX)?,
                contact_details: required(
                    draft.contact_details.take(),
                    "contactDetails",
                    SHORT_TEXT_MAX,
                )?,
                present_reading: required_list(draft.present_reading.take(), "presentReading")?,
                readers_feedback: optional(
                    draft.readers_feedback.take(),
                    "readersFeedback",
                    LONG_TEXT_MAX,
                )?,
            },
            SubmissionType::Ooh => SubmissionDetails::Ooh {
                segment: required(draft.segment.take(), "segment", SHORT_TEXT_MAX)?,
                contact_person: required(
                    draft.contact_person.take(),
                    "contactPerson",
                    SHORT_TEXT_MAX,
                )?,
                existing_newspaper: required_list(
                    draft.existing_newspaper.take(),
                    "existingNewspaper",
                )?,
                feedback_suggestion: optional(
                    draft.feedback_suggestion.take(),
                    "feedbackSuggestion",
                    LONG_TEXT_MAX,
                )?,
            },
        };

        Ok(Self {
            area,
            accompanied_by,
            details,
        })
    }

    /// Category of this submission.
    pub const fn submission_type(&self) -> SubmissionType {
        self.details.submission_type()
    }
}

/// Fully loaded submission.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[schema(value_type = String, format = Uuid)]
    pub id: SubmissionId,
    #[serde(rename = "type")]
    pub submission_type: SubmissionType,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub user_email: Option<String>,
    pub area: String,
    pub accompanied_by: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub details: SubmissionDetails,
}

/// Row in the submissions listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    #[schema(value_type = String, format = Uuid)]
    pub id: SubmissionId,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub area: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub submission_type: SubmissionType,
    pub user_email: Option<String>,
}

/// Row written to the CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionExportRow {
    pub id: SubmissionId,
    pub submission_type: SubmissionType,
    pub submitted_at: DateTime<Utc>,
    pub user_email: Option<String>,
    pub area: String,
    pub accompanied_by: Option<String>,
    /// Type-specific columns as stored.
    pub details: Value,
}
