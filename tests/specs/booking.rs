// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end booking flows

use crate::prelude::*;

#[tokio::test]
async fn books_commits_and_replays() {
    let world = World::new(TenantConfig::default());
    let orchestrator = world.orchestrator();
    let request = booking_request("call-1", "job-1", Window::Morning);

    let first = orchestrator.book(&request).await.expect("booking runs");
    let BookingResponse::Success(success) = &first else {
        panic!("expected success, got {first:?}");
    };
    assert_eq!(success.label, "Today morning (8\u{2013}12pm)");
    assert_eq!(world.directory.allocations().len(), 1);

    // The retry replays the stored response and touches nothing external.
    let calls_before = world.directory.calls().len();
    let second = orchestrator.book(&request).await.expect("replay runs");
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes"),
    );
    assert_eq!(world.directory.calls().len(), calls_before);
    assert_eq!(world.directory.allocations().len(), 1);
}

#[tokio::test]
async fn a_morning_fills_after_two_jobs_per_technician() {
    let world = World::new(TenantConfig::default());
    let orchestrator = world.orchestrator();

    for i in 1..=4 {
        let request = booking_request(&format!("call-{i}"), &format!("job-{i}"), Window::Morning);
        let response = orchestrator.book(&request).await.expect("booking runs");
        assert!(response.is_ok(), "booking {i} should fit: {response:?}");
    }
    assert_eq!(world.directory.allocations().len(), 4);

    let fifth = orchestrator
        .book(&booking_request("call-5", "job-5", Window::Morning))
        .await
        .expect("booking runs");
    assert_eq!(fifth.error_code(), Some(ErrorCode::NoCapacity));
    assert_eq!(world.directory.allocations().len(), 4);
}

#[tokio::test]
async fn confirmation_sms_rides_the_booking() {
    let world = World::new(TenantConfig::default());
    let orchestrator = world.orchestrator();
    let request = BookingRequest {
        sms: Some(SmsPayload {
            to_mobile: "0412 345 678".into(),
            message: "You're booked for the morning.".into(),
        }),
        ..booking_request("call-1", "job-1", Window::Morning)
    };

    let response = orchestrator.book(&request).await.expect("booking runs");
    let BookingResponse::Success(success) = response else {
        panic!("expected success");
    };
    assert_eq!(success.sms_sent, Some(true));
    let calls = world.sms.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].to, "+61412345678");
}

#[tokio::test]
async fn afternoon_booking_lands_in_the_afternoon_window() {
    let world = World::new(TenantConfig::default());
    let orchestrator = world.orchestrator();
    let response = orchestrator
        .book(&booking_request("call-1", "job-1", Window::Afternoon))
        .await
        .expect("booking runs");
    let BookingResponse::Success(success) = response else {
        panic!("expected success");
    };
    assert_eq!(success.label, "Today arvo (1\u{2013}4pm)");

    let allocations = world.directory.allocations();
    assert_eq!(allocations[0]["allocation_window_uuid"], "w-pm");
    assert_eq!(allocations[0]["start_time"], "12:00");
}
