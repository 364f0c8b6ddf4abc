// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Booking request/response wire contract

use crate::error::ErrorCode;
use crate::id::{AllocationId, JobId, TenantId, WindowId};
use crate::window::Window;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional confirmation SMS attached to a booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsPayload {
    pub to_mobile: String,
    pub message: String,
}

/// A request to reserve a technician time window for a job.
///
/// `call_id` is the caller's idempotency key: retries carry the same value
/// and replay the stored outcome instead of re-running side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub request_id: String,
    pub tenant_id: TenantId,
    pub call_id: String,
    pub job_id: JobId,
    pub date: NaiveDate,
    pub window: Window,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_window_id: Option<WindowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms: Option<SmsPayload>,
}

/// Successful booking outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSuccess {
    pub ok: bool,
    pub allocation_id: AllocationId,
    pub date: NaiveDate,
    pub window: Window,
    /// Customer-facing slot label, e.g. "Today morning (8–12pm)"
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_sent: Option<bool>,
}

/// Classified booking failure, as recorded and as returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingFailure {
    pub ok: bool,
    pub error_code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_body: Option<String>,
}

impl BookingFailure {
    pub fn new(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code,
            message: message.into(),
            debug_ref: None,
            external_status: None,
            external_body: None,
        }
    }

    /// Attach upstream Directory diagnostics
    pub fn with_external(mut self, status: u16, body: impl Into<String>) -> Self {
        self.external_status = Some(status);
        self.external_body = Some(body.into());
        self
    }

    pub fn with_debug_ref(mut self, debug_ref: impl Into<String>) -> Self {
        self.debug_ref = Some(debug_ref.into());
        self
    }
}

/// The orchestrator's terminal answer for one logical request.
///
/// Serialized shape discriminates on the `ok` field, matching the wire
/// contract; `Failure` bodies never carry an `allocation_id`, so untagged
/// deserialization is unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingResponse {
    Success(BookingSuccess),
    Failure(BookingFailure),
}

impl BookingResponse {
    pub fn success(
        allocation_id: AllocationId,
        date: NaiveDate,
        window: Window,
        label: impl Into<String>,
        sms_sent: Option<bool>,
    ) -> Self {
        Self::Success(BookingSuccess {
            ok: true,
            allocation_id,
            date,
            window,
            label: label.into(),
            sms_sent,
        })
    }

    pub fn failure(failure: BookingFailure) -> Self {
        Self::Failure(failure)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(f.error_code),
        }
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
