// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The allocation-create retry ladder
//!
//! Creating an allocation can fail for reasons worth one more attempt: a
//! Directory that rejects the scheduling-status field (400/422), or a stale
//! window mapping (persisting 422). The ladder is an explicit ordered policy
//! so the retry shape is testable without any I/O. At most two extra
//! attempts, never a loop.

/// One rung of the create ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAttempt {
    /// The full create body
    Full,
    /// Retry with the scheduling-status field omitted
    WithoutSchedulingStatus,
    /// Retry after refreshing the tenant's window mapping
    AfterWindowRefresh,
}

impl CreateAttempt {
    /// Does this rung carry the scheduling-status field? Only the first
    /// attempt does, and only when engine-mode scheduling is on; later rungs
    /// exist precisely because the Directory rejected it or the mapping was
    /// stale.
    pub fn includes_scheduling_status(self, engine_mode: bool) -> bool {
        engine_mode && self == Self::Full
    }

    /// The next rung for a failed create, or `None` when the failure is
    /// terminal and should be classified.
    ///
    /// `status` is the upstream HTTP status, absent for transport failures.
    /// Transport failures never retry: the create may have landed.
    pub fn next(self, status: Option<u16>, included_scheduling_status: bool) -> Option<Self> {
        match (self, status) {
            (Self::Full, Some(400 | 422)) if included_scheduling_status => {
                Some(Self::WithoutSchedulingStatus)
            }
            (Self::Full, Some(422)) => Some(Self::AfterWindowRefresh),
            (Self::WithoutSchedulingStatus, Some(422)) => Some(Self::AfterWindowRefresh),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "ladder_tests.rs"]
mod tests;
