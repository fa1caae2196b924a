//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::persistence_failure("disk"), ErrorCode::PersistenceFailure)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some("00000000-0000-0000-0000-000000000000"));
}

#[test]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[test]
fn serialises_camel_case_and_omits_empty_fields() {
    let value = serde_json::to_value(Error::not_found("User not found")).expect("serialise");
    assert_eq!(
        value,
        json!({ "code": "not_found", "message": "User not found" })
    );

    let value = serde_json::to_value(
        Error::persistence_failure("Failed to save user").with_trace_id("abc"),
    )
    .expect("serialise");
    assert_eq!(value.get("traceId"), Some(&json!("abc")));
    assert_eq!(value.get("code"), Some(&json!("persistence_failure")));
}

#[test]
fn detail_code_reads_details_entry() {
    let error = Error::invalid_request("Invalid email format")
        .with_details(json!({ "field": "email", "code": "invalid_format" }));
    assert_eq!(error.detail_code(), Some("invalid_format"));
    assert_eq!(Error::internal("boom").detail_code(), None);
}
