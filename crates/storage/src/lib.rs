// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! arvo-storage: SQLite persistence for the booking engine
//!
//! One [`Store`] owns the connection; each concern (idempotency ledger,
//! legacy capacity counters, window-id mapping, overrun monitor state and
//! SMS dedup claims) adds its methods from its own module. Unique
//! constraints are the concurrency primitive throughout: inserts either
//! claim a row or observe the existing one, never both.

mod capacity;
mod error;
mod ledger;
mod overrun;
mod store;
mod window_map;

pub use capacity::ReserveOutcome;
pub use error::StoreError;
pub use ledger::{LedgerGate, RunStatus};
pub use overrun::{OverrunState, SmsType};
pub use store::Store;
pub use window_map::WindowMapRecord;
