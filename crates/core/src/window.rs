// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two-bucket daily window model

use crate::clock_time::ClockTime;
use serde::{Deserialize, Serialize};

/// A fixed daily time bucket.
///
/// The business model is deliberately coarse: every bookable day has exactly
/// a morning and an afternoon, with fixed bounds. Anything finer-grained is
/// the slot-finding engine's concern within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    Morning,
    Afternoon,
}

impl Window {
    /// Parse a caller-supplied window name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            _ => None,
        }
    }

    /// Fixed window bounds: 08:00–12:00 morning, 12:00–17:00 afternoon.
    pub fn bounds(&self) -> (ClockTime, ClockTime) {
        match self {
            Self::Morning => (ClockTime::new(8, 0), ClockTime::new(12, 0)),
            Self::Afternoon => (ClockTime::new(12, 0), ClockTime::new(17, 0)),
        }
    }

    pub fn start(&self) -> ClockTime {
        self.bounds().0
    }

    pub fn end(&self) -> ClockTime {
        self.bounds().1
    }

    /// Window length in minutes
    pub fn length_minutes(&self) -> u32 {
        self.start().minutes_until(self.end())
    }

    /// Customer-facing label fragment. The hour ranges are the ones customers
    /// are told, not the allocation bounds ("arvo" jobs are promised 1–4pm
    /// even though the afternoon window runs 12:00–17:00).
    pub fn label_fragment(&self) -> &'static str {
        match self {
            Self::Morning => "morning (8\u{2013}12pm)",
            Self::Afternoon => "arvo (1\u{2013}4pm)",
        }
    }
}

crate::simple_display! {
    Window {
        Morning => "morning",
        Afternoon => "afternoon",
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
