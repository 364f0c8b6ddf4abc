// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overrun monitor state and SMS dedup claims
//!
//! `overrun_monitor_state` is a historical record keyed by allocation id; it
//! is upserted, never deleted. `overrun_sms_event` is the at-most-once
//! mechanism: a row's existence proves a notification of that type has been
//! sent or is in flight for that (source, target, type) triple. Claim before
//! sending; release only if the send fails.

use crate::error::StoreError;
use crate::store::Store;
use arvo_core::{AllocationId, JobId, TenantId};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

/// Notification types guarded by the claim table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsType {
    DelaySent,
    MajorDelayAlert,
    Eta30Min,
}

impl SmsType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DelaySent => "DELAY_SMS_SENT",
            Self::MajorDelayAlert => "MAJOR_DELAY_ALERT_SENT",
            Self::Eta30Min => "ETA_30MIN_SENT",
        }
    }
}

/// One allocation's overrun history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrunState {
    pub allocation: AllocationId,
    pub job: Option<JobId>,
    pub delay_minutes: i64,
    pub detected_at: Option<String>,
    pub major_alert_sent_at: Option<String>,
    pub thirty_away_sent_at: Option<String>,
    pub delay_sms_sent_at: Option<String>,
}

impl Store {
    /// Record (or update) an overrun. First detection timestamp is kept;
    /// delay minutes track the latest observation.
    pub fn record_overrun(
        &self,
        tenant: &TenantId,
        allocation: &AllocationId,
        job: Option<&JobId>,
        delay_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT INTO overrun_monitor_state
                 (allocation_id, tenant_id, job_id, delay_minutes, detected_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (allocation_id) DO UPDATE SET
                 delay_minutes = excluded.delay_minutes,
                 job_id = COALESCE(excluded.job_id, overrun_monitor_state.job_id)",
            params![
                allocation.as_str(),
                tenant.as_str(),
                job.map(|j| j.as_str()),
                delay_minutes,
                now.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn overrun_state(
        &self,
        allocation: &AllocationId,
    ) -> Result<Option<OverrunState>, StoreError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT allocation_id, job_id, delay_minutes, detected_at,
                        major_alert_sent_at, thirty_away_sent_at, delay_sms_sent_at
                 FROM overrun_monitor_state WHERE allocation_id = ?1",
                params![allocation.as_str()],
                |r| {
                    Ok(OverrunState {
                        allocation: AllocationId::new(r.get::<_, String>(0)?),
                        job: r.get::<_, Option<String>>(1)?.map(JobId::new),
                        delay_minutes: r.get(2)?,
                        detected_at: r.get(3)?,
                        major_alert_sent_at: r.get(4)?,
                        thirty_away_sent_at: r.get(5)?,
                        delay_sms_sent_at: r.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Stamp one of the per-notification sent timestamps.
    pub fn mark_delay_sms_sent(
        &self,
        allocation: &AllocationId,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.stamp(allocation, "delay_sms_sent_at", now)
    }

    pub fn mark_major_alert_sent(
        &self,
        allocation: &AllocationId,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.stamp(allocation, "major_alert_sent_at", now)
    }

    pub fn mark_thirty_away_sent(
        &self,
        allocation: &AllocationId,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.stamp(allocation, "thirty_away_sent_at", now)
    }

    fn stamp(
        &self,
        allocation: &AllocationId,
        column: &'static str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        // Column name comes from a fixed set above, never caller input.
        let sql =
            format!("UPDATE overrun_monitor_state SET {column} = ?2 WHERE allocation_id = ?1");
        self.conn.lock().execute(&sql, params![allocation.as_str(), now.to_rfc3339()])?;
        Ok(())
    }

    /// ETA accuracy inputs: (historical overrun rows, rows where a delay
    /// notice went out).
    pub fn overrun_totals(&self, tenant: &TenantId) -> Result<(i64, i64), StoreError> {
        let conn = self.conn.lock();
        let totals = conn.query_row(
            "SELECT COUNT(*), COUNT(delay_sms_sent_at)
             FROM overrun_monitor_state WHERE tenant_id = ?1",
            params![tenant.as_str()],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        Ok(totals)
    }

    /// Claim the right to send one notification. Returns `true` exactly once
    /// per (source, target, type); a `false` means an earlier or concurrent
    /// run already holds it.
    pub fn claim_sms(
        &self,
        source: &AllocationId,
        target: &JobId,
        sms_type: SmsType,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let changed = self.conn.lock().execute(
            "INSERT OR IGNORE INTO overrun_sms_event
                 (source_allocation_id, target_job_id, sms_type, sent_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![source.as_str(), target.as_str(), sms_type.as_str(), now.to_rfc3339()],
        )?;
        Ok(changed > 0)
    }

    /// Release a claim after a failed send so a later run can retry.
    pub fn release_sms(
        &self,
        source: &AllocationId,
        target: &JobId,
        sms_type: SmsType,
    ) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "DELETE FROM overrun_sms_event
             WHERE source_allocation_id = ?1 AND target_job_id = ?2 AND sms_type = ?3",
            params![source.as_str(), target.as_str(), sms_type.as_str()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "overrun_tests.rs"]
mod tests;
