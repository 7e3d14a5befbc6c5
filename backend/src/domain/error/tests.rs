//! Tests for the error payload constructors and serialisation contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn base_error() -> Error {
    Error::invalid_argument("complaintId is required.")
}

#[rstest]
#[case(Error::invalid_argument("bad"), ErrorCode::InvalidArgument)]
#[case(Error::unauthenticated("who?"), ErrorCode::Unauthenticated)]
#[case(Error::permission_denied("nope"), ErrorCode::PermissionDenied)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("later"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidArgument, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_fallback_for_blank_message() {
    let error = Error::new(ErrorCode::PermissionDenied, "");
    assert_eq!(error.message(), "permission denied");
}

#[rstest]
fn serialises_code_in_snake_case(base_error: Error) {
    let value = serde_json::to_value(base_error).expect("serialise error");
    assert_eq!(
        value,
        json!({ "code": "invalid_argument", "message": "complaintId is required." })
    );
}

#[rstest]
fn details_survive_round_trip(base_error: Error) {
    let error = base_error.with_details(json!({ "field": "complaintId" }));
    let encoded = serde_json::to_string(&error).expect("serialise error");
    let decoded: Error = serde_json::from_str(&encoded).expect("deserialise error");
    assert_eq!(decoded, error);
}

#[rstest]
fn deserialising_blank_message_fails() {
    let result = serde_json::from_value::<Error>(json!({ "code": "not_found", "message": " " }));
    assert!(result.is_err());
}
