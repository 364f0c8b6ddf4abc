// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::fake::FakeDirectory;
use super::*;
use serde_json::json;

#[tokio::test]
async fn fake_creates_and_lists_allocations() {
    let dir = FakeDirectory::new();
    let created = dir
        .post("joballocation.json", &json!({"job_uuid": "job-1", "start_time": "08:00"}))
        .await
        .unwrap();
    let uuid = created.record_id.unwrap();
    assert_eq!(uuid, "alloc-1");

    let listed = dir.get("joballocation.json").await.unwrap();
    let records = listed.data.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["uuid"], "alloc-1");
    assert_eq!(records[0]["job_uuid"], "job-1");

    let direct = dir.get("joballocation/alloc-1.json").await.unwrap();
    assert_eq!(direct.data["start_time"], "08:00");
}

#[tokio::test]
async fn fake_put_merges_and_delete_removes() {
    let dir = FakeDirectory::new();
    dir.post("joballocation.json", &json!({"job_uuid": "job-1"})).await.unwrap();

    dir.put("joballocation/alloc-1.json", &json!({"end_time": "10:00"})).await.unwrap();
    let direct = dir.get("joballocation/alloc-1.json").await.unwrap();
    assert_eq!(direct.data["end_time"], "10:00");
    assert_eq!(direct.data["job_uuid"], "job-1");

    dir.delete("joballocation/alloc-1.json").await.unwrap();
    let err = dir.get("joballocation/alloc-1.json").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn stub_takes_precedence_and_one_shots_pop() {
    let dir = FakeDirectory::new();
    dir.stub_push(
        "POST",
        "joballocation",
        Err(DirectoryError::Api { status: 422, body: "invalid window".into() }),
    );
    dir.stub_push(
        "POST",
        "joballocation",
        Ok(DirectoryResponse { record_id: Some("alloc-9".into()), data: serde_json::Value::Null }),
    );

    let first = dir.post("joballocation.json", &json!({})).await;
    assert_eq!(first.unwrap_err().status(), Some(422));
    // Second queued response is sticky from here on.
    let second = dir.post("joballocation.json", &json!({})).await.unwrap();
    assert_eq!(second.record_id.as_deref(), Some("alloc-9"));
    let third = dir.post("joballocation.json", &json!({})).await.unwrap();
    assert_eq!(third.record_id.as_deref(), Some("alloc-9"));
}

#[tokio::test]
async fn unmatched_get_returns_empty_list() {
    let dir = FakeDirectory::new();
    let response = dir.get("staff.json").await.unwrap();
    assert_eq!(response.data, json!([]));
}

#[tokio::test]
async fn calls_are_recorded_per_verb() {
    let dir = FakeDirectory::new();
    dir.get("staff.json").await.unwrap();
    dir.post("joballocation.json", &json!({})).await.unwrap();
    dir.delete("joballocation/alloc-1.json").await.unwrap();

    assert_eq!(dir.calls().len(), 3);
    let deletes = dir.calls_for("DELETE");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, "joballocation/alloc-1.json");
}

#[test]
fn error_accessors() {
    let api = DirectoryError::Api { status: 403, body: "denied".into() };
    assert_eq!(api.status(), Some(403));
    assert_eq!(api.body(), "denied");
    let transport = DirectoryError::Transport("timed out".into());
    assert_eq!(transport.status(), None);
    assert_eq!(transport.body(), "timed out");
}
