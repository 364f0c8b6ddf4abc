// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! arvo-engine: the booking orchestrator and the overrun monitor
//!
//! This crate owns the allocation commit protocol — idempotency gate,
//! capacity checks, external create with a bounded retry ladder, independent
//! verification, the compensating delete on local capacity conflict — and
//! the daily overrun / delay-cascade pass. Everything external arrives
//! through the adapter traits; everything durable goes through the store.

pub mod booking;
pub mod config;
pub mod error;
pub mod ladder;
pub mod overrun;
pub mod resolver;

pub use booking::{Orchestrator, BOOK_ENDPOINT};
pub use config::TenantConfig;
pub use error::{BookingError, MonitorError};
pub use ladder::CreateAttempt;
pub use overrun::{MonitorReport, OverrunMonitor};
pub use resolver::WindowResolver;
