// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of Directory allocation windows onto the morning/arvo axis

use crate::directory::{DirectoryAdapter, DirectoryError};
use crate::fields;
use arvo_core::{ClockTime, Window, WindowId};

/// One Directory-reported allocation window, classified where possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowCatalogEntry {
    pub id: WindowId,
    pub window: Option<Window>,
}

/// Classify a Directory window by name keywords, then by time bands.
///
/// Names win: `morning`/`am` vs `afternoon`/`arvo`/`pm`. Ambiguous names
/// fall through to the numeric bands: a window starting 07:00–13:00 or
/// ending 11:00–13:00 reads as morning; starting 12:00–15:00 or ending
/// 15:00–18:00 as afternoon.
pub fn classify_window(
    name: &str,
    start: Option<ClockTime>,
    end: Option<ClockTime>,
) -> Option<Window> {
    let lower = name.to_ascii_lowercase();
    let mentions_morning = lower.contains("morning") || lower.contains("am");
    let mentions_afternoon =
        lower.contains("afternoon") || lower.contains("arvo") || lower.contains("pm");
    match (mentions_morning, mentions_afternoon) {
        (true, false) => return Some(Window::Morning),
        (false, true) => return Some(Window::Afternoon),
        _ => {}
    }

    let in_band = |t: Option<ClockTime>, lo: (u32, u32), hi: (u32, u32)| {
        t.is_some_and(|t| t >= ClockTime::new(lo.0, lo.1) && t <= ClockTime::new(hi.0, hi.1))
    };
    if in_band(start, (7, 0), (13, 0)) || in_band(end, (11, 0), (13, 0)) {
        return Some(Window::Morning);
    }
    if in_band(start, (12, 0), (15, 0)) || in_band(end, (15, 0), (18, 0)) {
        return Some(Window::Afternoon);
    }
    None
}

/// Fetch and classify the tenant's allocation windows from the Directory.
pub async fn fetch_window_catalog<D: DirectoryAdapter>(
    directory: &D,
) -> Result<Vec<WindowCatalogEntry>, DirectoryError> {
    let response = directory.get("allocationwindow.json").await?;
    let Some(items) = response.data.as_array() else {
        return Ok(Vec::new());
    };
    let catalog = items
        .iter()
        .filter_map(|r| {
            let id = fields::first_str(r, fields::RECORD_UUID)?;
            let name = fields::first_str(r, fields::WINDOW_NAME).unwrap_or_default();
            let start = fields::first_str(r, fields::WINDOW_START).and_then(ClockTime::parse);
            let end = fields::first_str(r, fields::WINDOW_END).and_then(ClockTime::parse);
            Some(WindowCatalogEntry {
                id: WindowId::new(id),
                window: classify_window(name, start, end),
            })
        })
        .collect();
    Ok(catalog)
}

#[cfg(test)]
#[path = "windows_tests.rs"]
mod tests;
