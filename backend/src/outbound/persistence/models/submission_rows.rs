//! Typed rows for the six submission tables.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    CollectionMode, CollectionVisit, NewspaperCount, SubmissionDetails, SubmissionId,
    SubmissionRecord, UserId,
};
use crate::outbound::persistence::schema::{
    submissions_dealer, submissions_depo, submissions_ooh, submissions_reader, submissions_stall,
    submissions_vendor,
};

/// Row of `submissions_depo`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submissions_depo)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub area: String,
    pub accompanied_by: Option<String>,
    pub person_met: String,
    pub competition_activity: String,
    pub discussion: Option<String>,
    pub outcome: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Row of `submissions_vendor`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submissions_vendor)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VendorRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub area: String,
    pub accompanied_by: Option<String>,
    pub vendor_name: String,
    pub phone: String,
    pub outcome: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Row of `submissions_dealer`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submissions_dealer)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DealerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub area: String,
    pub accompanied_by: Option<String>,
    pub dealer_name: String,
    pub dues_amount: Option<f64>,
    pub collection_mode: Option<String>,
    pub collection_amount: Option<f64>,
    pub competition_newspapers: Value,
    pub discussion: Option<String>,
    pub outcome: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Row of `submissions_stall`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submissions_stall)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StallRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub area: String,
    pub accompanied_by: Option<String>,
    pub stall_owner: String,
    pub dues_amount: Option<f64>,
    pub collection_mode: Option<String>,
    pub collection_amount: Option<f64>,
    pub competition_newspapers: Value,
    pub discussion: Option<String>,
    pub outcome: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Row of `submissions_reader`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submissions_reader)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReaderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub area: String,
    pub reader_name: String,
    pub contact_details: String,
    pub present_reading: Vec<String>,
    pub readers_feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Row of `submissions_ooh`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submissions_ooh)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OohRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub area: String,
    pub segment: String,
    pub contact_person: String,
    pub existing_newspaper: Vec<String>,
    pub feedback_suggestion: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// A row of whichever table a submission lives in.
#[derive(Debug, Clone)]
pub(crate) enum SubmissionRow {
    Depo(DepoRow),
    Vendor(VendorRow),
    Dealer(DealerRow),
    Stall(StallRow),
    Reader(ReaderRow),
    Ooh(OohRow),
}

struct Envelope {
    id: Uuid,
    user_id: Uuid,
    area: String,
    accompanied_by: Option<String>,
    submitted_at: DateTime<Utc>,
}

impl SubmissionRow {
    /// Split a record into the row for its table.
    pub(crate) fn from_record(record: &SubmissionRecord) -> Result<Self, serde_json::Error> {
        let id = *record.id.as_uuid();
        let user_id = *record.user_id.as_uuid();
        let area = record.area.clone();
        let accompanied_by = record.accompanied_by.clone();
        let submitted_at = record.submitted_at;

        let row = match &record.details {
            SubmissionDetails::Depo {
                person_met,
                competition_activity,
                discussion,
                outcome,
            } => Self::Depo(DepoRow {
                id,
                user_id,
                area,
                accompanied_by,
                person_met: person_met.clone(),
                competition_activity: competition_activity.clone(),
                discussion: discussion.clone(),
                outcome: outcome.clone(),
                submitted_at,
            }),
            SubmissionDetails::Vendor {
                vendor_name,
                phone,
                outcome,
            } => Self::Vendor(VendorRow {
                id,
                user_id,
                area,
                accompanied_by,
                vendor_name: vendor_name.clone(),
                phone: phone.clone(),
                outcome: outcome.clone(),
                submitted_at,
            }),
            SubmissionDetails::Dealer(visit) => Self::Dealer(DealerRow {
                id,
                user_id,
                area,
                accompanied_by,
                dealer_name: visit.party.clone(),
                dues_amount: visit.dues_amount,
                collection_mode: visit.collection_mode.map(|mode| mode.as_str().to_owned()),
                collection_amount: visit.collection_amount,
                competition_newspapers: serde_json::to_value(&visit.competition_newspapers)?,
                discussion: visit.discussion.clone(),
                outcome: visit.outcome.clone(),
                submitted_at,
            }),
            SubmissionDetails::Stall(visit) => Self::Stall(StallRow {
                id,
                user_id,
                area,
                accompanied_by,
                stall_owner: visit.party.clone(),
                dues_amount: visit.dues_amount,
                collection_mode: visit.collection_mode.map(|mode| mode.as_str().to_owned()),
                collection_amount: visit.collection_amount,
                competition_newspapers: serde_json::to_value(&visit.competition_newspapers)?,
                discussion: visit.discussion.clone(),
                outcome: visit.outcome.clone(),
                submitted_at,
            }),
            SubmissionDetails::Reader {
                reader_name,
                contact_details,
                present_reading,
                readers_feedback,
            } => Self::Reader(ReaderRow {
                id,
                user_id,
                area,
                reader_name: reader_name.clone(),
                contact_details: contact_details.clone(),
                present_reading: present_reading.clone(),
                readers_feedback: readers_feedback.clone(),
                submitted_at,
            }),
            SubmissionDetails::Ooh {
                segment,
                contact_person,
                existing_newspaper,
                feedback_suggestion,
            } => Self::Ooh(OohRow {
                id,
                user_id,
                area,
                segment: segment.clone(),
                contact_person: contact_person.clone(),
                existing_newspaper: existing_newspaper.clone(),
                feedback_suggestion: feedback_suggestion.clone(),
                submitted_at,
            }),
        };
        Ok(row)
    }

    /// Rebuild the domain record, attaching the submitter's email.
    pub(crate) fn into_record(self, user_email: Option<String>) -> Result<SubmissionRecord, String> {
        let (envelope, details) = match self {
            Self::Depo(row) => (
                Envelope {
                    id: row.id,
                    user_id: row.user_id,
                    area: row.area,
                    accompanied_by: row.accompanied_by,
                    submitted_at: row.submitted_at,
                },
                SubmissionDetails::Depo {
                    person_met: row.person_met,
                    competition_activity: row.competition_activity,
                    discussion: row.discussion,
                    outcome: row.outcome,
                },
            ),
            Self::Vendor(row) => (
                Envelope {
                    id: row.id,
                    user_id: row.user_id,
                    area: row.area,
                    accompanied_by: row.accompanied_by,
                    submitted_at: row.submitted_at,
                },
                SubmissionDetails::Vendor {
                    vendor_name: row.vendor_name,
                    phone: row.phone,
                    outcome: row.outcome,
                },
            ),
            Self::Dealer(row) => (
                Envelope {
                    id: row.id,
                    user_id: row.user_id,
                    area: row.area,
                    accompanied_by: row.accompanied_by,
                    submitted_at: row.submitted_at,
                },
                SubmissionDetails::Dealer(collection_visit(
                    row.dealer_name,
                    (row.dues_amount, row.collection_mode, row.collection_amount),
                    row.competition_newspapers,
                    row.discussion,
                    row.outcome,
                )?),
            ),
            Self::Stall(row) => (
                Envelope {
                    id: row.id,
                    user_id: row.user_id,
                    area: row.area,
                    accompanied_by: row.accompanied_by,
                    submitted_at: row.submitted_at,
                },
                SubmissionDetails::Stall(collection_visit(
                    row.stall_owner,
                    (row.dues_amount, row.collection_mode, row.collection_amount),
                    row.competition_newspapers,
                    row.discussion,
                    row.outcome,
                )?),
            ),
            Self::Reader(row) => (
                Envelope {
                    id: row.id,
                    user_id: row.user_id,
                    area: row.area,
                    accompanied_by: None,
                    submitted_at: row.submitted_at,
                },
                SubmissionDetails::Reader {
                    reader_name: row.reader_name,
                    contact_details: row.contact_details,
                    present_reading: row.present_reading,
                    readers_feedback: row.readers_feedback,
                },
            ),
            Self::Ooh(row) => (
                Envelope {
                    id: row.id,
                    user_id: row.user_id,
                    area: row.area,
                    accompanied_by: None,
                    submitted_at: row.submitted_at,
                },
                SubmissionDetails::Ooh {
                    segment: row.segment,
                    contact_person: row.contact_person,
                    existing_newspaper: row.existing_newspaper,
                    feedback_suggestion: row.feedback_suggestion,
                },
            ),
        };

        Ok(SubmissionRecord {
            id: SubmissionId::from_uuid(envelope.id),
            submission_type: details.submission_type(),
            user_id: UserId::from_uuid(envelope.user_id),
            user_email,
            area: envelope.area,
            accompanied_by: envelope.accompanied_by,
            submitted_at: envelope.submitted_at,
            details,
        })
    }
}

type Collection = (Option<f64>, Option<String>, Option<f64>);

fn collection_visit(
    party: String,
    (dues_amount, collection_mode, collection_amount): Collection,
    competition_newspapers: Value,
    discussion: Option<String>,
    outcome: Option<String>,
) -> Result<CollectionVisit, String> {
    let collection_mode = collection_mode
        .map(|raw| raw.parse::<CollectionMode>())
        .transpose()
        .map_err(|err| format!("stored collection mode: {err}"))?;
    let competition_newspapers: Vec<NewspaperCount> =
        serde_json::from_value(competition_newspapers)
            .map_err(|err| format!("stored competition newspapers: {err}"))?;
    Ok(CollectionVisit {
        party,
        dues_amount,
        collection_mode,
        collection_amount,
        competition_newspapers,
        discussion,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn dealer_record() -> SubmissionRecord {
        SubmissionRecord {
            id: SubmissionId::random(),
            submission_type: crate::domain::SubmissionType::Dealer,
            user_id: UserId::random(),
            user_email: Some("agent@example.com".to_owned()),
            area: "Thane".to_owned(),
            accompanied_by: Some("Area manager".to_owned()),
            submitted_at: Utc
                .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
            details: SubmissionDetails::Dealer(CollectionVisit {
                party: "Mehta Agencies".to_owned(),
                dues_amount: Some(1500.0),
                collection_mode: Some(CollectionMode::OnlinePay),
                collection_amount: Some(1200.5),
                competition_newspapers: vec![NewspaperCount {
                    name: "Daily Star".to_owned(),
                    number: "40".to_owned(),
                }],
                discussion: None,
                outcome: Some("Will clear balance next week".to_owned()),
            }),
        }
    }

    #[rstest]
    fn dealer_rows_store_mode_and_newspapers_as_text_and_json() {
        let record = dealer_record();
        let SubmissionRow::Dealer(row) = SubmissionRow::from_record(&record).expect("row") else {
            panic!("expected a dealer row");
        };
        assert_eq!(row.collection_mode.as_deref(), Some("Online Pay"));
        assert_eq!(
            row.competition_newspapers,
            json!([{ "name": "Daily Star", "number": "40" }])
        );

        let rebuilt = SubmissionRow::Dealer(row)
            .into_record(record.user_email.clone())
            .expect("record");
        assert_eq!(rebuilt, record);
    }

    #[rstest]
    fn unknown_stored_mode_is_reported() {
        let SubmissionRow::Dealer(mut row) =
            SubmissionRow::from_record(&dealer_record()).expect("row")
        else {
            panic!("expected a dealer row");
        };
        row.collection_mode = Some("Barter".to_owned());
        let err = SubmissionRow::Dealer(row)
            .into_record(None)
            .expect_err("invalid mode");
        assert!(err.contains("collection mode"));
    }
}
