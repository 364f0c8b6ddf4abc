// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock time of day (`HH:MM`) and minute arithmetic
//!
//! The Directory reports allocation and shift times as bare clock strings
//! with no date or zone attached. All window maths happens in minutes since
//! midnight, so this type stays deliberately tiny.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A time of day with minute precision.
///
/// Ordering is chronological, which for the zero-padded `HH:MM` rendering is
/// also lexicographic — the tie-break rule in slot selection relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u32,
}

impl ClockTime {
    /// Construct from hour/minute, clamping to 23:59.
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { minutes: (hour.min(23)) * 60 + minute.min(59) }
    }

    /// Construct from minutes since midnight, clamping to 23:59.
    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes: minutes.min(23 * 60 + 59) }
    }

    /// Parse `HH:MM`, tolerating a trailing `:SS` as the Directory sends on
    /// some record types. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().splitn(3, ':');
        let hour: u32 = parts.next()?.parse().ok()?;
        let minute: u32 = parts.next()?.parse().ok()?;
        if let Some(secs) = parts.next() {
            let _: u32 = secs.parse().ok()?;
        }
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self::new(hour, minute))
    }

    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes % 60
    }

    /// Minutes since midnight
    pub fn total_minutes(&self) -> u32 {
        self.minutes
    }

    /// Add minutes, clamping at 23:59.
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        Self::from_minutes(self.minutes + minutes)
    }

    /// Minutes from `self` to `later`; zero if `later` is earlier.
    pub fn minutes_until(&self, later: ClockTime) -> u32 {
        later.minutes.saturating_sub(self.minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ClockTime::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid clock time: {s:?}")))
    }
}

#[cfg(test)]
#[path = "clock_time_tests.rs"]
mod tests;
