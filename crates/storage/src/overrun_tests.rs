// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 4, 0, 0).unwrap()
}

fn tenant() -> TenantId {
    TenantId::new("tenant-1")
}

#[test]
fn record_overrun_upserts_and_keeps_first_detection() {
    let store = Store::in_memory().unwrap();
    let alloc = AllocationId::new("alloc-1");
    let job = JobId::new("job-1");

    store.record_overrun(&tenant(), &alloc, Some(&job), 20, now()).unwrap();
    let later = now() + chrono::Duration::minutes(10);
    store.record_overrun(&tenant(), &alloc, Some(&job), 30, later).unwrap();

    let state = store.overrun_state(&alloc).unwrap().unwrap();
    assert_eq!(state.delay_minutes, 30);
    assert_eq!(state.detected_at.unwrap(), now().to_rfc3339());
    assert_eq!(state.job.unwrap(), "job-1");
}

#[test]
fn sent_timestamps_are_individually_stamped() {
    let store = Store::in_memory().unwrap();
    let alloc = AllocationId::new("alloc-1");
    store.record_overrun(&tenant(), &alloc, None, 20, now()).unwrap();

    store.mark_delay_sms_sent(&alloc, now()).unwrap();
    let state = store.overrun_state(&alloc).unwrap().unwrap();
    assert!(state.delay_sms_sent_at.is_some());
    assert!(state.major_alert_sent_at.is_none());
    assert!(state.thirty_away_sent_at.is_none());

    store.mark_major_alert_sent(&alloc, now()).unwrap();
    store.mark_thirty_away_sent(&alloc, now()).unwrap();
    let state = store.overrun_state(&alloc).unwrap().unwrap();
    assert!(state.major_alert_sent_at.is_some());
    assert!(state.thirty_away_sent_at.is_some());
}

#[test]
fn claim_is_at_most_once() {
    let store = Store::in_memory().unwrap();
    let source = AllocationId::new("alloc-1");
    let target = JobId::new("job-2");

    assert!(store.claim_sms(&source, &target, SmsType::DelaySent, now()).unwrap());
    // Second claim for the same triple loses.
    assert!(!store.claim_sms(&source, &target, SmsType::DelaySent, now()).unwrap());
    // Different type or target is a separate claim.
    assert!(store.claim_sms(&source, &target, SmsType::MajorDelayAlert, now()).unwrap());
    assert!(store.claim_sms(&source, &JobId::new("job-3"), SmsType::DelaySent, now()).unwrap());
}

#[test]
fn release_permits_reclaim() {
    let store = Store::in_memory().unwrap();
    let source = AllocationId::new("alloc-1");
    let target = JobId::new("job-2");

    assert!(store.claim_sms(&source, &target, SmsType::Eta30Min, now()).unwrap());
    store.release_sms(&source, &target, SmsType::Eta30Min).unwrap();
    assert!(store.claim_sms(&source, &target, SmsType::Eta30Min, now()).unwrap());
}

#[test]
fn totals_feed_eta_accuracy() {
    let store = Store::in_memory().unwrap();
    for (alloc, notified) in [("a1", true), ("a2", false), ("a3", true), ("a4", false)] {
        let alloc = AllocationId::new(alloc);
        store.record_overrun(&tenant(), &alloc, None, 15, now()).unwrap();
        if notified {
            store.mark_delay_sms_sent(&alloc, now()).unwrap();
        }
    }
    assert_eq!(store.overrun_totals(&tenant()).unwrap(), (4, 2));
    // Other tenants do not leak in.
    assert_eq!(store.overrun_totals(&TenantId::new("tenant-2")).unwrap(), (0, 0));
}

#[test]
fn sms_type_strings() {
    assert_eq!(SmsType::DelaySent.as_str(), "DELAY_SMS_SENT");
    assert_eq!(SmsType::MajorDelayAlert.as_str(), "MAJOR_DELAY_ALERT_SENT");
    assert_eq!(SmsType::Eta30Min.as_str(), "ETA_30MIN_SENT");
}
