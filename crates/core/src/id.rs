// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for external and caller-issued ids

crate::string_id! {
    /// One field-service business account in the Directory.
    pub struct TenantId;
}

crate::string_id! {
    /// A job record in the Directory.
    pub struct JobId;
}

crate::string_id! {
    /// A staff member (technician) in the Directory.
    pub struct StaffId;
}

crate::string_id! {
    /// A committed job allocation in the Directory.
    pub struct AllocationId;
}

crate::string_id! {
    /// A Directory-side allocation window (the raw id behind morning/arvo).
    pub struct WindowId;
}

crate::string_id! {
    /// A Directory-side processing queue.
    pub struct QueueId;
}

/// Generate a short opaque reference for failure diagnostics.
///
/// Returned to callers as `debug_ref` so a support conversation can be tied
/// back to the ledger row without exposing internal ids.
pub fn debug_ref() -> String {
    nanoid::nanoid!(12)
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
