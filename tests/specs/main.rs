// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level end-to-end specs
//!
//! These drive the public crate APIs the way an embedding service would:
//! a real (in-memory) store, the fake Directory and SMS gateway, and a
//! controllable clock. Unit-level coverage lives beside each module; these
//! exercise whole flows.

mod prelude {
    pub use arvo_adapters::{FakeDirectory, FakeSmsSender};
    pub use arvo_core::{
        BookingRequest, BookingResponse, ErrorCode, FakeClock, JobId, SmsPayload, TenantId,
        Window,
    };
    pub use arvo_engine::{MonitorError, Orchestrator, OverrunMonitor, TenantConfig};
    pub use arvo_storage::Store;
    pub use chrono::NaiveDate;
    pub use serde_json::json;
    pub use std::sync::Arc;

    pub struct World {
        pub directory: FakeDirectory,
        pub sms: FakeSmsSender,
        pub clock: FakeClock,
        pub store: Arc<Store>,
        pub config: TenantConfig,
    }

    impl World {
        /// A tenant with two technicians and both windows mapped.
        pub fn new(config: TenantConfig) -> Self {
            let directory = FakeDirectory::new();
            directory.stub_get_json(
                "staff.json",
                json!([
                    {"uuid": "staff-a", "first": "Ava", "last": "Hill", "active": "1"},
                    {"uuid": "staff-b", "first": "Ben", "last": "Cole", "active": "1"},
                ]),
            );
            directory.stub_get_json(
                "allocationwindow.json",
                json!([
                    {"uuid": "w-am", "name": "Morning", "start_time": "08:00", "end_time": "12:00"},
                    {"uuid": "w-pm", "name": "Afternoon", "start_time": "12:00", "end_time": "17:00"},
                ]),
            );
            Self {
                directory,
                sms: FakeSmsSender::new(),
                clock: FakeClock::new(), // 2026-01-05 00:00 UTC = 10:00 local Monday
                store: Arc::new(Store::in_memory().expect("in-memory store")),
                config,
            }
        }

        pub fn orchestrator(&self) -> Orchestrator<FakeDirectory, FakeSmsSender, FakeClock> {
            Orchestrator::new(
                self.directory.clone(),
                self.sms.clone(),
                self.clock.clone(),
                self.store.clone(),
                self.config.clone(),
            )
        }

        pub fn monitor(&self) -> OverrunMonitor<FakeDirectory, FakeSmsSender, FakeClock> {
            OverrunMonitor::new(
                self.directory.clone(),
                self.sms.clone(),
                self.clock.clone(),
                self.store.clone(),
                self.config.clone(),
            )
        }
    }

    pub fn booking_request(call_id: &str, job_id: &str, window: Window) -> BookingRequest {
        BookingRequest {
            request_id: format!("req-{call_id}"),
            tenant_id: TenantId::new("t1"),
            call_id: call_id.to_string(),
            job_id: JobId::new(job_id),
            date: NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date"),
            window,
            allocation_window_id: None,
            sms: None,
        }
    }
}

mod booking;
mod monitor;
