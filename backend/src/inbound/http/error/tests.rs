//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("Passwords do not match"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("Invalid login credentials"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("Access denied. Admin only."), StatusCode::FORBIDDEN)]
#[case(Error::not_found("Failed to update user status"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("already registered"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn decode_response(error: Error, expected_trace_id: Option<&str>) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), status_for(error.code()));

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace id header is set")
                .to_str()
                .expect("trace id is ascii");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace id header should be absent"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error envelope decodes")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("row decode panicked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let payload = decode_response(error, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("Please fill in all fields")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "email"}));

    let payload = decode_response(error, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "Please fill in all fields");
    assert_eq!(payload.details(), Some(&json!({"field": "email"})));
}

#[rstest]
#[actix_web::test]
async fn errors_without_trace_id_omit_the_header() {
    let error = Error::conflict("User already registered");
    let payload = decode_response(error, None).await;
    assert_eq!(payload.code(), ErrorCode::Conflict);
    assert_eq!(payload.trace_id(), None);
}

#[given("an internal error carrying details")]
fn an_internal_error_carrying_details() -> Error {
    Error::internal("boom")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": true}))
}

#[when("the adapter prepares the client payload")]
fn the_adapter_prepares_the_client_payload(error: Error) -> Error {
    redact_if_internal(&error)
}

#[then("only the generic message and trace id remain")]
fn only_the_generic_message_and_trace_id_remain(payload: Error) {
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[rstest]
fn redaction_keeps_trace_id() {
    let error = an_internal_error_carrying_details();
    let payload = the_adapter_prepares_the_client_payload(error);
    only_the_generic_message_and_trace_id_remain(payload);
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
