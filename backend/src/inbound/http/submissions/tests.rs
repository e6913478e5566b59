//! Handler tests for submission endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::test as actix_test;
use pagination::{PageMeta, PageRequest};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::Role;
use crate::domain::ports::SubmissionExport;
use crate::domain::test_support::fixture_timestamp;
use crate::inbound::http::test_utils::{MockPorts, authenticated, bearer, test_app};

async fn get_json(ports: MockPorts, uri: &str) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

fn summary(kind: SubmissionType) -> SubmissionSummary {
    let actor = crate::domain::test_support::actor(Role::User);
    SubmissionSummary {
        id: SubmissionId::random(),
        user_id: actor.id,
        area: "Dadar".to_owned(),
        submitted_at: fixture_timestamp(),
        submission_type: kind,
        user_email: Some("user@example.com".to_owned()),
    }
}

#[actix_web::test]
async fn create_returns_identifier_and_message() {
    let mut ports = MockPorts::default();
    let caller = authenticated(&mut ports.login, Role::User, false);
    let stored = SubmissionId::random();
    ports
        .submissions
        .expect_create_submission()
        .withf(move |actor, submission| {
            actor.id == caller.id
                && submission.submission_type() == SubmissionType::Vendor
                && submission.area == "Dadar"
        })
        .times(1)
        .returning(move |_, _| Ok(stored));

    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::post()
        .uri("/submissions")
        .insert_header(bearer())
        .set_json(json!({
            "type": "vendor",
            "area": " Dadar ",
            "vendorName": "Sai News",
            "phone": "9820012345"
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], stored.to_string());
    assert_eq!(body["message"], "Submitted successfully");
}

#[rstest]
#[case(json!({ "type": "kiosk", "area": "Dadar" }), "type", "invalid_submission_type")]
#[case(json!({ "type": "vendor", "vendorName": "Sai", "phone": "1" }), "area", "missing_field")]
#[case(
    json!({ "type": "reader", "area": "Dadar", "readerName": "A", "contactDetails": "B", "presentReading": [] }),
    "presentReading",
    "empty_list"
)]
#[case(
    json!({ "type": "dealer", "area": "Dadar", "dealerName": "D", "duesAmount": -5.0 }),
    "duesAmount",
    "invalid_amount"
)]
#[actix_web::test]
async fn create_rejects_invalid_drafts(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::User, false);
    ports.submissions.expect_create_submission().never();

    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::post()
        .uri("/submissions")
        .insert_header(bearer())
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn list_passes_filter_and_page_to_port() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .submissions_query
        .expect_list_submissions()
        .withf(|_, filter, page| {
            filter.submission_type == Some(SubmissionType::Ooh)
                && filter.area.as_deref() == Some("dad")
                && filter.range.from().is_some()
                && page.page() == 2
                && page.limit() == 1
        })
        .times(1)
        .returning(|_, _, page| {
            Ok(Paginated::new(
                vec![summary(SubmissionType::Ooh)],
                PageMeta::new(page, 3),
            ))
        });

    let (status, body) = get_json(
        ports,
        "/submissions?type=ooh&area=dad&from=2025-03-01&page=2&limit=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["type"], "ooh");
    assert_eq!(body["data"][0]["userEmail"], "user@example.com");
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 3);
}

#[rstest]
#[case("/submissions?limit=101", "limit", "out_of_range")]
#[case("/submissions?page=0", "page", "out_of_range")]
#[case("/submissions?from=14-03-2025", "from", "invalid_date")]
#[case("/submissions?from=2025-03-02&to=2025-03-01", "from", "inverted_range")]
#[case("/submissions?user=someone", "user", "invalid_uuid")]
#[case("/submissions?type=kiosk", "type", "invalid_submission_type")]
#[actix_web::test]
async fn list_rejects_invalid_query(#[case] uri: &str, #[case] field: &str, #[case] code: &str) {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Ceo, false);
    ports.submissions_query.expect_list_submissions().never();

    let (status, body) = get_json(ports, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn list_defaults_to_first_page_of_twenty() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .submissions_query
        .expect_list_submissions()
        .withf(|_, filter, page| {
            *filter == SubmissionFilter::default() && page.page() == 1 && page.limit() == 20
        })
        .returning(|_, _, page| Ok(Paginated::new(Vec::new(), PageMeta::new(page, 0))));

    let (status, body) = get_json(ports, "/submissions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["totalPages"], 0);
}

#[actix_web::test]
async fn areas_forward_type_filter() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .submissions_query
        .expect_list_areas()
        .withf(|_, kind| *kind == Some(SubmissionType::Dealer))
        .returning(|_, _| Ok(vec!["Andheri".to_owned(), "Dadar".to_owned()]));

    let (status, body) = get_json(ports, "/submissions/areas?type=dealer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Andheri", "Dadar"]));
}

#[actix_web::test]
async fn export_is_a_csv_attachment() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Ceo, false);
    ports
        .submissions_query
        .expect_export_submissions()
        .withf(|_, filter| filter.submission_type == Some(SubmissionType::Stall))
        .returning(|_, _| {
            Ok(SubmissionExport {
                filename: "submissions-2025-03-14.csv".to_owned(),
                csv: "ID,Type\n1,stall\n".to_owned(),
                rows: 1,
            })
        });

    let app = actix_test::init_service(test_app(ports)).await;
    let request = actix_test::TestRequest::get()
        .uri("/submissions/export?type=stall")
        .insert_header(bearer())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    let content_type = headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/csv"));
    let disposition = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("submissions-2025-03-14.csv"));
    let body = actix_test::read_body(response).await;
    assert_eq!(body.as_ref(), b"ID,Type\n1,stall\n");
}

#[actix_web::test]
async fn get_flattens_type_specific_fields() {
    let id = SubmissionId::random();
    let uri = format!("/submissions/vendor/{id}");
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .submissions_query
        .expect_get_submission()
        .withf(move |_, kind, wanted| *kind == SubmissionType::Vendor && *wanted == id)
        .returning(move |_, _, _| {
            let owner = summary(SubmissionType::Vendor);
            Ok(SubmissionRecord {
                id,
                submission_type: SubmissionType::Vendor,
                user_id: owner.user_id,
                user_email: owner.user_email,
                area: owner.area,
                accompanied_by: None,
                submitted_at: owner.submitted_at,
                details: crate::domain::SubmissionDetails::Vendor {
                    vendor_name: "Sai News".to_owned(),
                    phone: "9820012345".to_owned(),
                    outcome: None,
                },
            })
        });

    let (status, body) = get_json(ports, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["type"], "vendor");
    assert_eq!(body["vendorName"], "Sai News");
    assert_eq!(body["phone"], "9820012345");
    assert!(body.get("details").is_none());
}

#[rstest]
#[case("/submissions/kiosk/6f1c2c2e-8f3a-4d6b-9a41-2f4f1f7c0c11", "invalid_submission_type")]
#[case("/submissions/depo/not-a-uuid", "invalid_uuid")]
#[actix_web::test]
async fn get_rejects_malformed_path(#[case] uri: &str, #[case] code: &str) {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports.submissions_query.expect_get_submission().never();

    let (status, body) = get_json(ports, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn get_surfaces_not_found() {
    let mut ports = MockPorts::default();
    authenticated(&mut ports.login, Role::Admin, false);
    ports
        .submissions_query
        .expect_get_submission()
        .returning(|_, _, _| Err(Error::not_found("Submission not found")));

    let uri = format!("/submissions/depo/{}", SubmissionId::random());
    let (status, body) = get_json(ports, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Submission not found");
}

#[test]
fn page_request_fixture_matches_handler_defaults() {
    let request = PageRequest::new(None, None, 100).expect("defaults are valid");
    assert_eq!((request.page(), request.limit()), (1, 20));
}
