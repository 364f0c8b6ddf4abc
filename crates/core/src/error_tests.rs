// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    validation = { ErrorCode::ValidationError, "VALIDATION_ERROR" },
    past_window = { ErrorCode::PastWindow, "PAST_WINDOW" },
    no_capacity = { ErrorCode::NoCapacity, "NO_CAPACITY" },
    missing_window = { ErrorCode::MissingAllocationWindow, "MISSING_ALLOCATION_WINDOW" },
    unauth = { ErrorCode::Servicem8Unauth, "SERVICEM8_UNAUTH" },
    scope = { ErrorCode::Servicem8InsufficientScope, "SERVICEM8_INSUFFICIENT_SCOPE" },
    upstream_validation = { ErrorCode::Servicem8ValidationError, "SERVICEM8_VALIDATION_ERROR" },
    alloc_failed = { ErrorCode::Servicem8AllocFailed, "SERVICEM8_ALLOC_FAILED" },
    missing_uuid = { ErrorCode::AllocationMissingUuid, "ALLOCATION_MISSING_UUID" },
    verify_failed = { ErrorCode::AllocationVerifyFailed, "ALLOCATION_VERIFY_FAILED" },
)]
fn string_forms_round_trip(code: ErrorCode, s: &str) {
    assert_eq!(code.as_str(), s);
    assert_eq!(code.to_string(), s);
    assert_eq!(ErrorCode::parse(s), Some(code));
    assert_eq!(serde_json::to_string(&code).unwrap(), format!("\"{s}\""));
    let back: ErrorCode = serde_json::from_str(&format!("\"{s}\"")).unwrap();
    assert_eq!(back, code);
}

#[parameterized(
    unauth = { 401, ErrorCode::Servicem8Unauth },
    forbidden = { 403, ErrorCode::Servicem8InsufficientScope },
    unprocessable = { 422, ErrorCode::Servicem8ValidationError },
    server_error = { 500, ErrorCode::Servicem8AllocFailed },
    bad_request = { 400, ErrorCode::Servicem8AllocFailed },
)]
fn status_classification(status: u16, expected: ErrorCode) {
    assert_eq!(ErrorCode::from_directory_status(status), expected);
}

#[test]
fn parse_rejects_unknown() {
    assert_eq!(ErrorCode::parse("SOMETHING_ELSE"), None);
}
