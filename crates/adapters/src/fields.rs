// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative field maps for Directory record normalization
//!
//! Directory records are loosely shaped: the same logical field turns up
//! under different key names across tenants and API versions. Each logical
//! field is one ordered alias list here; the first present, non-empty key
//! wins. All normalization goes through these tables so the precedence is
//! in one place instead of scattered conditionals.

use serde_json::Value;

/// Ordered alias list for one logical field, highest precedence first
pub type FieldAliases = &'static [&'static str];

pub const RECORD_UUID: FieldAliases = &["uuid", "id"];

// Staff records
pub const STAFF_ACTIVE: FieldAliases = &["active", "is_active"];
pub const STAFF_FIRST_NAME: FieldAliases = &["first", "first_name", "name"];
pub const STAFF_LAST_NAME: FieldAliases = &["last", "last_name"];
pub const STAFF_WORK_START: FieldAliases = &["work_start", "shift_start", "start_time", "day_start"];
pub const STAFF_WORK_END: FieldAliases = &["work_end", "shift_end", "finish_time", "day_end"];

// Job-allocation records
pub const ALLOC_STAFF: FieldAliases = &["staff_uuid", "allocated_to_staff_uuid", "staff_id"];
pub const ALLOC_JOB: FieldAliases = &["job_uuid", "job_id"];
pub const ALLOC_DATE: FieldAliases = &["allocation_date", "scheduled_date", "date"];
pub const ALLOC_START: FieldAliases = &["start_time", "allocation_start_time", "start"];
pub const ALLOC_END: FieldAliases = &["end_time", "allocation_end_time", "finish_time", "end"];
pub const ALLOC_WINDOW: FieldAliases = &["allocation_window_uuid", "window_uuid"];
pub const ALLOC_COMPLETED_AT: FieldAliases =
    &["completion_timestamp", "completed_timestamp", "completion_date"];

// Allocation-window records
pub const WINDOW_NAME: FieldAliases = &["name", "window_name", "description"];
pub const WINDOW_START: FieldAliases = &["start_time", "window_start"];
pub const WINDOW_END: FieldAliases = &["end_time", "window_end"];

// Job and contact records
pub const JOB_QUEUE: FieldAliases = &["queue_uuid", "active_queue_uuid"];
pub const CONTACT_JOB: FieldAliases = &["job_uuid", "job_id"];
pub const CONTACT_TYPE: FieldAliases = &["type", "contact_type"];
pub const CONTACT_MOBILE: FieldAliases = &["mobile", "mobile_phone", "phone"];
pub const QUEUE_ACTIVE: FieldAliases = &["active", "is_active"];

/// First alias present with a non-empty string value.
pub fn first_str<'a>(record: &'a Value, aliases: FieldAliases) -> Option<&'a str> {
    for key in aliases {
        if let Some(s) = record.get(*key).and_then(Value::as_str) {
            if !s.trim().is_empty() {
                return Some(s);
            }
        }
    }
    None
}

/// First alias present with any non-null value.
pub fn first_value<'a>(record: &'a Value, aliases: FieldAliases) -> Option<&'a Value> {
    for key in aliases {
        if let Some(v) = record.get(*key) {
            if !v.is_null() {
                return Some(v);
            }
        }
    }
    None
}

/// Truthiness for the Directory's loose boolean encodings.
///
/// Missing means `default`; `"1"`, `"true"`, `true`, and nonzero numbers are
/// true; `"0"`, `"false"`, `false`, and zero are false.
pub fn bool_like(record: &Value, aliases: FieldAliases, default: bool) -> bool {
    let Some(v) = first_value(record, aliases) else {
        return default;
    };
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().map(|i| i != 0).unwrap_or(default),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => default,
        },
        _ => default,
    }
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
