// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture helpers shared by this crate's tests and downstream crates
//! (enabled via the `test-support` feature).

use crate::capacity::{BookedSpan, StaffMember};
use crate::clock_time::ClockTime;
use crate::id::StaffId;

/// Staff member with default work hours and a name derived from the id.
pub fn staff(id: &str) -> StaffMember {
    StaffMember { id: StaffId::new(id), name: id.to_string(), work_start: None, work_end: None }
}

/// Booked span from `HH:MM` strings. Panics on bad input, test-only.
#[allow(clippy::panic)]
pub fn span(staff_id: &str, start: &str, end: &str) -> BookedSpan {
    let parse = |s: &str| match ClockTime::parse(s) {
        Some(t) => t,
        None => panic!("bad clock time in fixture: {s}"),
    };
    BookedSpan { staff: StaffId::new(staff_id), start: parse(start), end: parse(end) }
}
