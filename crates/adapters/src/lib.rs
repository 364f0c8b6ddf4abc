// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! arvo-adapters: boundary to the external Directory and the SMS gateway
//!
//! Everything in here is translation, not policy: raw Directory records go
//! in, engine-shaped staff/allocation/window values come out. The engine
//! crate only ever sees the [`DirectoryAdapter`] and [`SmsSender`] traits.

pub mod allocations;
pub mod directory;
pub mod fields;
pub mod mobile;
pub mod records;
pub mod sms;
pub mod windows;

pub use allocations::allocations_for_date;
pub use directory::{DirectoryAdapter, DirectoryError, DirectoryResponse, HttpDirectory};
pub use mobile::normalize_mobile;
pub use records::{
    allocations_from_value, booked_spans, contact_mobile_from_value, first_active_queue,
    job_queue_from_value, staff_from_value, AllocationRecord,
};
pub use sms::{HttpSmsSender, SmsError, SmsSender};
pub use windows::{classify_window, fetch_window_catalog, WindowCatalogEntry};

#[cfg(any(test, feature = "test-support"))]
pub use directory::fake::{DirectoryCall, FakeDirectory};
#[cfg(any(test, feature = "test-support"))]
pub use sms::fake::{FakeSmsSender, SmsCall};
