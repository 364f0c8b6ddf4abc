// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure capacity / slot-finding engine
//!
//! [`plan_slot`] is the whole scheduling brain: given staff, their existing
//! allocations for the target window, and the requested job, pick a
//! technician and a start time — or report the window full. It is a pure
//! function of its inputs so the commit protocol around it can be tested
//! against it deterministically.

use crate::clock_time::ClockTime;
use crate::id::StaffId;
use crate::window::Window;
use serde::{Deserialize, Serialize};

/// A technician as the engine sees one: an id and an optional shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    /// Shift start; engine assumes 08:00 when absent
    pub work_start: Option<ClockTime>,
    /// Shift end; engine assumes 17:00 when absent
    pub work_end: Option<ClockTime>,
}

impl StaffMember {
    /// Shift bounds, defaulting to 08:00–17:00 when the record has none.
    pub fn work_hours(&self) -> (ClockTime, ClockTime) {
        (
            self.work_start.unwrap_or_else(|| ClockTime::new(8, 0)),
            self.work_end.unwrap_or_else(|| ClockTime::new(17, 0)),
        )
    }
}

/// An existing committed reservation, already filtered to the target window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSpan {
    pub staff: StaffId,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// What the caller wants placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub window: Window,
    pub duration_minutes: u32,
    pub max_jobs_per_window: u32,
    pub buffer_ratio: f64,
}

impl SlotRequest {
    /// Job duration plus the proportional scheduling buffer, rounded up.
    pub fn effective_minutes(&self) -> u32 {
        let buffer = (self.duration_minutes as f64 * self.buffer_ratio).ceil() as u32;
        self.duration_minutes + buffer
    }
}

/// The chosen technician and time slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChoice {
    pub staff: StaffId,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Per-staff workings, kept in the decision for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUsage {
    pub staff: StaffId,
    /// Minutes of existing allocations clipped to the window bounds
    pub used_minutes: u32,
    /// Existing allocation count in this window
    pub job_count: u32,
    /// Earliest viable start, when one exists
    pub candidate_start: Option<ClockTime>,
    pub eligible: bool,
}

/// Outcome of one [`plan_slot`] run. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityDecision {
    pub effective_minutes: u32,
    pub usage: Vec<StaffUsage>,
    /// `None` means the window is full for every staff member
    pub choice: Option<SlotChoice>,
}

impl CapacityDecision {
    pub fn window_full(&self) -> bool {
        self.choice.is_none()
    }
}

/// Assign a technician and slot for the request, or report the window full.
///
/// Selection rule: among eligible staff, lowest used minutes wins; ties go to
/// the earliest candidate start; remaining ties to input order. Eligibility
/// requires all three of: existing job count below `max_jobs_per_window`,
/// `used + effective` fitting the window length, and an actual contiguous gap
/// of `effective_minutes` inside window ∩ work hours.
pub fn plan_slot(
    staff: &[StaffMember],
    booked: &[BookedSpan],
    req: &SlotRequest,
) -> CapacityDecision {
    let effective = req.effective_minutes();
    let (win_start, win_end) = req.window.bounds();
    let window_len = req.window.length_minutes();

    let mut usage = Vec::with_capacity(staff.len());
    for member in staff {
        let mut spans: Vec<&BookedSpan> =
            booked.iter().filter(|s| s.staff == member.id).collect();
        spans.sort_by_key(|s| s.start);

        let mut used_minutes = 0u32;
        let mut job_count = 0u32;
        for span in &spans {
            let clip_start = span.start.max(win_start);
            let clip_end = span.end.min(win_end);
            let clipped = clip_start.minutes_until(clip_end);
            if clipped > 0 {
                used_minutes += clipped;
                job_count += 1;
            }
        }

        let candidate_start = find_gap(member, &spans, win_start, win_end, effective);
        let eligible = job_count < req.max_jobs_per_window
            && used_minutes + effective <= window_len
            && candidate_start.is_some();

        usage.push(StaffUsage {
            staff: member.id.clone(),
            used_minutes,
            job_count,
            candidate_start,
            eligible,
        });
    }

    let mut best: Option<&StaffUsage> = None;
    for u in usage.iter().filter(|u| u.eligible) {
        let replace = match best {
            None => true,
            Some(b) => {
                u.used_minutes < b.used_minutes
                    || (u.used_minutes == b.used_minutes
                        && u.candidate_start < b.candidate_start)
            }
        };
        if replace {
            best = Some(u);
        }
    }

    let choice = best.and_then(|u| {
        u.candidate_start.map(|start| SlotChoice {
            staff: u.staff.clone(),
            start,
            end: start.plus_minutes(effective),
        })
    });

    CapacityDecision { effective_minutes: effective, usage, choice }
}

/// Earliest start of a contiguous free interval of `effective` minutes inside
/// the intersection of the window bounds and the member's work hours.
///
/// `spans` must be sorted by start. The candidate sits either in a gap before
/// an allocation or immediately after the last one.
fn find_gap(
    member: &StaffMember,
    spans: &[&BookedSpan],
    win_start: ClockTime,
    win_end: ClockTime,
    effective: u32,
) -> Option<ClockTime> {
    let (work_start, work_end) = member.work_hours();
    let lower = win_start.max(work_start);
    let upper = win_end.min(work_end);
    if lower.minutes_until(upper) < effective {
        return None;
    }

    let mut cursor = lower;
    for span in spans {
        if span.end <= cursor {
            continue;
        }
        if span.start >= upper {
            break;
        }
        if cursor.minutes_until(span.start) >= effective {
            return Some(cursor);
        }
        cursor = cursor.max(span.end);
    }
    if cursor.minutes_until(upper) >= effective {
        return Some(cursor);
    }
    None
}

#[cfg(test)]
#[path = "capacity_tests.rs"]
mod tests;
