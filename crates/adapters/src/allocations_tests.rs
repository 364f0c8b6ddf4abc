// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::directory::fake::FakeDirectory;
use crate::directory::DirectoryError;
use serde_json::json;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

#[tokio::test]
async fn first_encoding_wins_when_it_succeeds() {
    let dir = FakeDirectory::new();
    dir.seed_allocation(json!({
        "uuid": "a1", "staff_uuid": "s1", "allocation_date": "2026-01-05",
        "start_time": "08:00", "end_time": "10:00"
    }));
    let records = allocations_for_date(&dir, date()).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a1");
    // Only the first encoding was attempted.
    assert_eq!(dir.calls_for("GET").len(), 1);
}

#[tokio::test]
async fn falls_back_to_next_encoding_on_error() {
    let dir = FakeDirectory::new();
    dir.stub_push(
        "GET",
        "joballocation.json?%24filter",
        Err(DirectoryError::Api { status: 400, body: "bad filter".into() }),
    );
    dir.seed_allocation(json!({
        "uuid": "a1", "staff_uuid": "s1", "allocation_date": "2026-01-05"
    }));
    let records = allocations_for_date(&dir, date()).await;
    assert_eq!(records.len(), 1);
    assert_eq!(dir.calls_for("GET").len(), 2);
}

#[tokio::test]
async fn client_side_date_filter_applies() {
    let dir = FakeDirectory::new();
    dir.seed_allocation(json!({"uuid": "a1", "allocation_date": "2026-01-05"}));
    dir.seed_allocation(json!({"uuid": "a2", "allocation_date": "2026-01-06"}));
    dir.seed_allocation(json!({"uuid": "a3"}));
    let records = allocations_for_date(&dir, date()).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a1");
}

#[tokio::test]
async fn exhaustion_returns_empty() {
    let dir = FakeDirectory::new();
    dir.stub_failure("GET", "joballocation", 500, "down");
    let records = allocations_for_date(&dir, date()).await;
    assert!(records.is_empty());
    assert_eq!(dir.calls_for("GET").len(), 3);
}
