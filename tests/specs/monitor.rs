// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end overrun monitoring

use crate::prelude::*;

fn enabled() -> TenantConfig {
    TenantConfig { overrun_monitor_enabled: true, ..TenantConfig::default() }
}

#[tokio::test]
async fn simulated_overrun_cascades_to_the_next_job() {
    let world = World::new(enabled());
    // Two jobs on staff-a's run today; the first is on schedule as seeded.
    world.directory.seed_allocation(json!({
        "uuid": "alloc-1",
        "staff_uuid": "staff-a",
        "job_uuid": "job-1",
        "allocation_date": "2026-01-05",
        "start_time": "09:45",
        "end_time": "10:45",
    }));
    world.directory.seed_allocation(json!({
        "uuid": "alloc-2",
        "staff_uuid": "staff-a",
        "job_uuid": "job-2",
        "allocation_date": "2026-01-05",
        "start_time": "10:30",
        "end_time": "11:30",
    }));
    world.directory.stub_get_json(
        "jobcontact.json",
        json!([{"job_uuid": "job-2", "type": "JOB", "mobile": "0412345678"}]),
    );

    let monitor = world.monitor();
    let report = monitor
        .simulate_overrun(&TenantId::new("t1"), &JobId::new("job-1"), 90)
        .await
        .expect("monitor pass runs");

    // Backdated to 08:15–09:15 against a local 10:00: 45 minutes over.
    assert_eq!(report.overruns, 1);
    assert_eq!(report.notifications_sent, 1);
    let calls = world.sms.calls();
    assert_eq!(calls[0].to, "+61412345678");
    assert!(calls[0].message.contains("45 minutes behind"));

    // A second pass over the same state stays quiet.
    let again = monitor.run(&TenantId::new("t1")).await.expect("monitor pass runs");
    assert_eq!(again.notifications_sent, 0);
    assert_eq!(world.sms.sent_count(), 1);
}

#[tokio::test]
async fn monitor_respects_the_feature_flag() {
    let world = World::new(TenantConfig::default());
    let monitor = world.monitor();
    let err = monitor.run(&TenantId::new("t1")).await.expect_err("flag is off");
    assert!(matches!(err, MonitorError::Disabled));
}
