// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Booking failure taxonomy
//!
//! Every failure that crosses the orchestrator boundary is classified into
//! one of these codes before being recorded in the ledger and returned to
//! the caller. Upstream Directory status/body ride along as diagnostics but
//! never become the primary code.

use serde::{Deserialize, Serialize};

/// Classified booking failure codes. The serialized strings are the wire
/// contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    PastWindow,
    NoCapacity,
    MissingAllocationWindow,
    Servicem8Unauth,
    Servicem8InsufficientScope,
    Servicem8ValidationError,
    Servicem8AllocFailed,
    AllocationMissingUuid,
    AllocationVerifyFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::PastWindow => "PAST_WINDOW",
            Self::NoCapacity => "NO_CAPACITY",
            Self::MissingAllocationWindow => "MISSING_ALLOCATION_WINDOW",
            Self::Servicem8Unauth => "SERVICEM8_UNAUTH",
            Self::Servicem8InsufficientScope => "SERVICEM8_INSUFFICIENT_SCOPE",
            Self::Servicem8ValidationError => "SERVICEM8_VALIDATION_ERROR",
            Self::Servicem8AllocFailed => "SERVICEM8_ALLOC_FAILED",
            Self::AllocationMissingUuid => "ALLOCATION_MISSING_UUID",
            Self::AllocationVerifyFailed => "ALLOCATION_VERIFY_FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "VALIDATION_ERROR" => Some(Self::ValidationError),
            "PAST_WINDOW" => Some(Self::PastWindow),
            "NO_CAPACITY" => Some(Self::NoCapacity),
            "MISSING_ALLOCATION_WINDOW" => Some(Self::MissingAllocationWindow),
            "SERVICEM8_UNAUTH" => Some(Self::Servicem8Unauth),
            "SERVICEM8_INSUFFICIENT_SCOPE" => Some(Self::Servicem8InsufficientScope),
            "SERVICEM8_VALIDATION_ERROR" => Some(Self::Servicem8ValidationError),
            "SERVICEM8_ALLOC_FAILED" => Some(Self::Servicem8AllocFailed),
            "ALLOCATION_MISSING_UUID" => Some(Self::AllocationMissingUuid),
            "ALLOCATION_VERIFY_FAILED" => Some(Self::AllocationVerifyFailed),
            _ => None,
        }
    }

    /// Map a Directory HTTP status to the code for a failed create.
    pub fn from_directory_status(status: u16) -> Self {
        match status {
            401 => Self::Servicem8Unauth,
            403 => Self::Servicem8InsufficientScope,
            422 => Self::Servicem8ValidationError,
            _ => Self::Servicem8AllocFailed,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
