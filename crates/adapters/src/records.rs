// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalization of raw Directory records into engine shapes

use crate::fields;
use arvo_core::{
    AllocationId, BookedSpan, ClockTime, JobId, StaffId, StaffMember, Window, WindowId,
};
use chrono::NaiveDate;
use serde_json::Value;

/// A Directory job-allocation, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRecord {
    pub id: AllocationId,
    pub staff: Option<StaffId>,
    pub job: Option<JobId>,
    pub date: Option<NaiveDate>,
    pub start: Option<ClockTime>,
    pub end: Option<ClockTime>,
    pub window_id: Option<WindowId>,
    pub completed_at: Option<String>,
}

impl AllocationRecord {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Does this allocation belong to the given semantic window?
    ///
    /// A record carrying a window id matches by id; otherwise its time span
    /// must overlap the window bounds.
    pub fn in_window(&self, window: Window, window_id: Option<&WindowId>) -> bool {
        if let (Some(own), Some(target)) = (self.window_id.as_ref(), window_id) {
            return own == target;
        }
        let (win_start, win_end) = window.bounds();
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < win_end && end > win_start,
            (Some(start), None) => start < win_end && start >= win_start,
            _ => false,
        }
    }
}

/// Active staff from a raw Directory list.
///
/// Inactive records are dropped; missing work hours stay `None` so the
/// engine applies its 08:00–17:00 default.
pub fn staff_from_value(data: &Value) -> Vec<StaffMember> {
    let Some(items) = data.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|r| fields::bool_like(r, fields::STAFF_ACTIVE, true))
        .filter_map(|r| {
            let id = fields::first_str(r, fields::RECORD_UUID)?;
            let first = fields::first_str(r, fields::STAFF_FIRST_NAME).unwrap_or_default();
            let last = fields::first_str(r, fields::STAFF_LAST_NAME).unwrap_or_default();
            let name = match (first.is_empty(), last.is_empty()) {
                (false, false) => format!("{first} {last}"),
                (false, true) => first.to_string(),
                _ => last.to_string(),
            };
            Some(StaffMember {
                id: StaffId::new(id),
                name,
                work_start: fields::first_str(r, fields::STAFF_WORK_START)
                    .and_then(ClockTime::parse),
                work_end: fields::first_str(r, fields::STAFF_WORK_END).and_then(ClockTime::parse),
            })
        })
        .collect()
}

/// Allocations from a raw Directory list. Records without a uuid are dropped.
pub fn allocations_from_value(data: &Value) -> Vec<AllocationRecord> {
    let Some(items) = data.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|r| {
            let id = fields::first_str(r, fields::RECORD_UUID)?;
            Some(AllocationRecord {
                id: AllocationId::new(id),
                staff: fields::first_str(r, fields::ALLOC_STAFF).map(StaffId::new),
                job: fields::first_str(r, fields::ALLOC_JOB).map(JobId::new),
                date: fields::first_str(r, fields::ALLOC_DATE)
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
                start: fields::first_str(r, fields::ALLOC_START).and_then(ClockTime::parse),
                end: fields::first_str(r, fields::ALLOC_END).and_then(ClockTime::parse),
                window_id: fields::first_str(r, fields::ALLOC_WINDOW).map(WindowId::new),
                completed_at: fields::first_str(r, fields::ALLOC_COMPLETED_AT)
                    .map(str::to_string),
            })
        })
        .collect()
}

/// Engine input spans: incomplete allocations in the target window with a
/// usable staff id. Missing times default to the window bounds, which is the
/// conservative reading (the slot is treated as consuming the whole window).
pub fn booked_spans(
    records: &[AllocationRecord],
    window: Window,
    window_id: Option<&WindowId>,
) -> Vec<BookedSpan> {
    let (win_start, win_end) = window.bounds();
    records
        .iter()
        .filter(|r| !r.is_completed() && r.in_window(window, window_id))
        .filter_map(|r| {
            let staff = r.staff.clone()?;
            Some(BookedSpan {
                staff,
                start: r.start.unwrap_or(win_start),
                end: r.end.unwrap_or(win_end),
            })
        })
        .collect()
}

/// Customer mobile for a job from a raw contact list, preferring the `JOB`
/// contact type over billing or other contacts.
pub fn contact_mobile_from_value(data: &Value, job: &JobId) -> Option<String> {
    let items = data.as_array()?;
    let for_job: Vec<&Value> = items
        .iter()
        .filter(|r| fields::first_str(r, fields::CONTACT_JOB).is_some_and(|j| j == job.as_str()))
        .collect();
    let preferred = for_job.iter().find(|r| {
        fields::first_str(r, fields::CONTACT_TYPE)
            .is_some_and(|t| t.eq_ignore_ascii_case("job"))
    });
    preferred
        .or_else(|| for_job.first())
        .and_then(|r| fields::first_str(r, fields::CONTACT_MOBILE))
        .map(str::to_string)
}

/// Queue uuid straight off a job record, when present.
pub fn job_queue_from_value(data: &Value) -> Option<String> {
    fields::first_str(data, fields::JOB_QUEUE).map(str::to_string)
}

/// First active queue from a raw queue list.
pub fn first_active_queue(data: &Value) -> Option<String> {
    let items = data.as_array()?;
    items
        .iter()
        .find(|r| fields::bool_like(r, fields::QUEUE_ACTIVE, true))
        .and_then(|r| fields::first_str(r, fields::RECORD_UUID))
        .map(str::to_string)
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
