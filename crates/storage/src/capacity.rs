// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Legacy per-window capacity counters and the job→window booking link
//!
//! `reserve_slot` is the local half of the booking saga: one transaction
//! re-checks the capacity invariant, increments the counter, and upserts the
//! job link. On conflict the caller compensates by deleting the external
//! allocation it already created.

use crate::error::StoreError;
use crate::store::Store;
use arvo_core::{AllocationId, JobId, TenantId, Window};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

/// Result of the transactional capacity reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    Reserved,
    /// The re-check failed: another booking took the last slot since the
    /// orchestrator's pre-check. Nothing was written.
    Conflict,
}

impl Store {
    /// Seed the capacity row for a window if it does not exist yet.
    pub fn ensure_window_capacity(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        window: Window,
        max_capacity: u32,
    ) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT INTO window_capacity (tenant_id, date, window, max_capacity, booked_count)
             VALUES (?1, ?2, ?3, ?4, 0)
             ON CONFLICT (tenant_id, date, window) DO NOTHING",
            params![tenant.as_str(), date.to_string(), window.to_string(), max_capacity],
        )?;
        Ok(())
    }

    /// Remaining bookable slots after the emergency reserve, or `None` when
    /// no capacity row exists for the window.
    pub fn window_remaining(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        window: Window,
        emergency_reserve: u32,
    ) -> Result<Option<i64>, StoreError> {
        let conn = self.conn.lock();
        let row: Option<(i64, i64)> = conn
            .query_row(
                "SELECT max_capacity, booked_count FROM window_capacity
                 WHERE tenant_id = ?1 AND date = ?2 AND window = ?3",
                params![tenant.as_str(), date.to_string(), window.to_string()],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        Ok(row.map(|(max, booked)| max - booked - emergency_reserve as i64))
    }

    /// Atomically re-check capacity, increment the booked counter, and upsert
    /// the job→window link. All or nothing.
    pub fn reserve_slot(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        window: Window,
        emergency_reserve: u32,
        job: &JobId,
        allocation: &AllocationId,
    ) -> Result<ReserveOutcome, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let row: Option<(i64, i64)> = tx
            .query_row(
                "SELECT max_capacity, booked_count FROM window_capacity
                 WHERE tenant_id = ?1 AND date = ?2 AND window = ?3",
                params![tenant.as_str(), date.to_string(), window.to_string()],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        let remaining = match row {
            Some((max, booked)) => max - booked - emergency_reserve as i64,
            None => 0,
        };
        if remaining <= 0 {
            tracing::debug!(%tenant, %date, %window, remaining, "capacity re-check failed");
            // Drop the transaction unwritten.
            return Ok(ReserveOutcome::Conflict);
        }

        tx.execute(
            "UPDATE window_capacity SET booked_count = booked_count + 1
             WHERE tenant_id = ?1 AND date = ?2 AND window = ?3",
            params![tenant.as_str(), date.to_string(), window.to_string()],
        )?;
        tx.execute(
            "INSERT INTO job_window_booking (job_id, tenant_id, date, window, allocation_id, status)
             VALUES (?1, ?2, ?3, ?4, ?5, 'booked')
             ON CONFLICT (job_id) DO UPDATE SET
                 date = excluded.date,
                 window = excluded.window,
                 allocation_id = excluded.allocation_id,
                 status = excluded.status",
            params![
                job.as_str(),
                tenant.as_str(),
                date.to_string(),
                window.to_string(),
                allocation.as_str()
            ],
        )?;
        tx.commit()?;
        Ok(ReserveOutcome::Reserved)
    }

    /// Booked count for a window (diagnostics and tests).
    pub fn booked_count(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        window: Window,
    ) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        let count = conn
            .query_row(
                "SELECT booked_count FROM window_capacity
                 WHERE tenant_id = ?1 AND date = ?2 AND window = ?3",
                params![tenant.as_str(), date.to_string(), window.to_string()],
                |r| r.get(0),
            )
            .optional()?
            .unwrap_or(0);
        Ok(count)
    }
}

#[cfg(test)]
#[path = "capacity_tests.rs"]
mod tests;
