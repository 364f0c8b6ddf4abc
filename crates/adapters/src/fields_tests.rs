// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use yare::parameterized;

#[test]
fn first_str_respects_precedence() {
    let record = json!({"shift_start": "09:00", "work_start": "07:30"});
    assert_eq!(first_str(&record, STAFF_WORK_START), Some("07:30"));
}

#[test]
fn first_str_skips_empty_and_missing() {
    let record = json!({"work_start": "", "shift_start": "09:00"});
    assert_eq!(first_str(&record, STAFF_WORK_START), Some("09:00"));
    assert_eq!(first_str(&json!({}), STAFF_WORK_START), None);
}

#[parameterized(
    missing_defaults_active = { json!({}), true },
    string_one = { json!({"active": "1"}), true },
    string_true = { json!({"active": "true"}), true },
    bool_true = { json!({"active": true}), true },
    number_one = { json!({"active": 1}), true },
    string_zero = { json!({"active": "0"}), false },
    bool_false = { json!({"active": false}), false },
    number_zero = { json!({"active": 0}), false },
    alias_key = { json!({"is_active": "false"}), false },
)]
fn active_flag_truthiness(record: serde_json::Value, expected: bool) {
    assert_eq!(bool_like(&record, STAFF_ACTIVE, true), expected);
}

#[test]
fn unrecognized_string_keeps_default() {
    assert!(bool_like(&json!({"active": "maybe"}), STAFF_ACTIVE, true));
    assert!(!bool_like(&json!({"active": "maybe"}), STAFF_ACTIVE, false));
}

#[test]
fn first_value_skips_null() {
    let record = json!({"completion_timestamp": null, "completed_timestamp": "2026-01-05 10:00:00"});
    assert_eq!(
        first_value(&record, ALLOC_COMPLETED_AT).and_then(serde_json::Value::as_str),
        Some("2026-01-05 10:00:00")
    );
}
