// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Australian mobile number normalization
//!
//! Everything outbound is E.164 `+61` mobile. Landlines and foreign numbers
//! normalize to `None` and the caller skips the send rather than guessing.

/// Normalize a raw phone string to E.164 `+61` mobile form.
///
/// Accepted shapes (after stripping spaces, dashes, and parentheses):
/// `+614xxxxxxxx`, `614xxxxxxxx`, `04xxxxxxxx`, and bare `4xxxxxxxx`.
pub fn normalize_mobile(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if let Some(rest) = cleaned.strip_prefix("+61") {
        if rest.len() == 9 && rest.starts_with('4') && rest.chars().all(|c| c.is_ascii_digit()) {
            return Some(cleaned);
        }
        return None;
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match (cleaned.len(), cleaned.as_bytes()) {
        (11, [b'6', b'1', b'4', ..]) => Some(format!("+{cleaned}")),
        (10, [b'0', b'4', ..]) => Some(format!("+61{}", &cleaned[1..])),
        (9, [b'4', ..]) => Some(format!("+61{cleaned}")),
        _ => None,
    }
}

#[cfg(test)]
#[path = "mobile_tests.rs"]
mod tests;
