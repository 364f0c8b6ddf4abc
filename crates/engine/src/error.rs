// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types
//!
//! Business failures never appear here: the orchestrator classifies those
//! into the `ErrorCode` taxonomy and records them in the ledger. These types
//! cover infrastructure the caller genuinely cannot proceed without.

use arvo_adapters::{DirectoryError, SmsError};
use arvo_storage::StoreError;
use thiserror::Error;

/// Infrastructure failure inside the booking orchestrator
#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure of an overrun monitor pass
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The feature flag is off for this tenant
    #[error("overrun monitor is disabled for this tenant")]
    Disabled,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// A claimed notification failed to send; the claim was released so a
    /// later pass can retry.
    #[error(transparent)]
    Sms(#[from] SmsError),
}
