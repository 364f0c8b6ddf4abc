// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! arvo-core: domain types and pure scheduling logic for the arvo booking engine

pub mod macros;

pub mod booking;
pub mod capacity;
pub mod clock;
pub mod clock_time;
pub mod error;
pub mod id;
pub mod window;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use booking::{BookingFailure, BookingRequest, BookingResponse, BookingSuccess, SmsPayload};
pub use capacity::{plan_slot, BookedSpan, CapacityDecision, SlotChoice, SlotRequest, StaffMember, StaffUsage};
pub use clock::{Clock, FakeClock, SystemClock};
pub use clock_time::ClockTime;
pub use error::ErrorCode;
pub use id::{debug_ref, AllocationId, JobId, QueueId, StaffId, TenantId, WindowId};
pub use window::Window;
