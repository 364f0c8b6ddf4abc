// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-tenant booking configuration
//!
//! Deserialized from TOML; every tunable has a serde default so a tenant
//! section only states what it overrides. The business timezone is a fixed
//! UTC offset in minutes (+600 is AEST) — the two-bucket window model does
//! not need DST-aware arithmetic.

use arvo_core::{Clock, ClockTime, StaffId};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantConfig {
    /// Business timezone as minutes east of UTC
    pub utc_offset_minutes: i32,
    /// Latest local time an afternoon booking for today is accepted
    pub afternoon_cutoff: ClockTime,
    /// Staff the non-engine path books against
    pub default_staff_id: Option<StaffId>,
    pub max_jobs_per_window: u32,
    pub buffer_ratio: f64,
    /// Slots held back from the legacy counter for emergencies
    pub emergency_reserve: u32,
    /// Seed value for a window's legacy capacity row
    pub default_window_capacity: u32,
    /// Select staff and slot with the capacity engine
    pub use_capacity_engine: bool,
    /// Enforce the per-window booked counter transactionally
    pub use_legacy_capacity: bool,
    pub overrun_monitor_enabled: bool,
    /// Minutes past scheduled end before an allocation counts as overrun
    pub grace_minutes: i64,
    /// Overrun minutes beyond which the dispatcher is alerted
    pub major_delay_minutes: i64,
    pub dispatcher_mobile: Option<String>,
    /// Assumed job duration when a request carries none
    pub default_job_minutes: u32,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 600,
            afternoon_cutoff: ClockTime::new(15, 0),
            default_staff_id: None,
            max_jobs_per_window: 2,
            buffer_ratio: 0.2,
            emergency_reserve: 1,
            default_window_capacity: 4,
            use_capacity_engine: true,
            use_legacy_capacity: false,
            overrun_monitor_enabled: false,
            grace_minutes: 15,
            major_delay_minutes: 60,
            dispatcher_mobile: None,
            default_job_minutes: 60,
        }
    }
}

impl TenantConfig {
    /// The tenant's fixed business offset. An out-of-range configured value
    /// degrades to UTC rather than panicking.
    pub fn business_offset(&self) -> FixedOffset {
        match FixedOffset::east_opt(self.utc_offset_minutes * 60) {
            Some(offset) => offset,
            None => Utc.fix(),
        }
    }

    /// Business-local now from the injected clock.
    pub fn local_now<C: Clock>(&self, clock: &C) -> DateTime<FixedOffset> {
        clock.now_utc().with_timezone(&self.business_offset())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
