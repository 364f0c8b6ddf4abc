// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotency ledger: one row per (tenant, endpoint, call_id)
//!
//! State machine: STARTED → SUCCEEDED (terminal, replay source of truth) or
//! STARTED → FAILED → STARTED on retry. There is no SUCCEEDED → anything
//! transition.

use crate::error::StoreError;
use crate::store::Store;
use arvo_core::{BookingResponse, ErrorCode, TenantId};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

/// Ledger row status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Started,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "STARTED",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }

    fn from_db(s: &str) -> Self {
        match s {
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            _ => Self::Started,
        }
    }
}

/// What the orchestrator learns at the top of a request.
#[derive(Debug)]
pub enum LedgerGate {
    /// No prior completed attempt; run the business logic under this row id.
    Fresh(i64),
    /// A prior attempt succeeded; return this verbatim and do nothing else.
    Replay(BookingResponse),
    /// Another caller holds a STARTED row for the same key right now.
    ///
    /// The caller proceeds anyway (documented race: uniqueness only guards
    /// the row, not the business logic), but the distinction is surfaced so
    /// call sites can log it and a blocking strategy stays a local change.
    InFlight(i64),
}

impl Store {
    /// Admit a logical request: insert STARTED, replay a SUCCEEDED result,
    /// or reopen a FAILED row.
    ///
    /// The insert is atomic (`ON CONFLICT DO NOTHING`); a concurrent first
    /// caller that loses the race observes the winner's row instead of
    /// creating a duplicate.
    pub fn get_or_start(
        &self,
        tenant: &TenantId,
        endpoint: &str,
        call_id: &str,
        now: DateTime<Utc>,
    ) -> Result<LedgerGate, StoreError> {
        let conn = self.conn.lock();
        let ts = now.to_rfc3339();
        let inserted = conn.execute(
            "INSERT INTO tool_run (tenant_id, endpoint, call_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, 'STARTED', ?4, ?4)
             ON CONFLICT (tenant_id, endpoint, call_id) DO NOTHING",
            params![tenant.as_str(), endpoint, call_id, ts],
        )?;
        if inserted > 0 {
            return Ok(LedgerGate::Fresh(conn.last_insert_rowid()));
        }

        let row: Option<(i64, String, Option<String>)> = conn
            .query_row(
                "SELECT id, status, result_json FROM tool_run
                 WHERE tenant_id = ?1 AND endpoint = ?2 AND call_id = ?3",
                params![tenant.as_str(), endpoint, call_id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;
        let Some((id, status, result_json)) = row else {
            // Row vanished between insert and read; treat as a fresh insert retry.
            let again = conn.execute(
                "INSERT INTO tool_run (tenant_id, endpoint, call_id, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 'STARTED', ?4, ?4)",
                params![tenant.as_str(), endpoint, call_id, ts],
            )?;
            debug_assert_eq!(again, 1);
            return Ok(LedgerGate::Fresh(conn.last_insert_rowid()));
        };

        match RunStatus::from_db(&status) {
            RunStatus::Succeeded => {
                tracing::debug!(%tenant, endpoint, call_id, "replaying stored result");
                let stored = result_json.unwrap_or_default();
                let response: BookingResponse = serde_json::from_str(&stored)?;
                Ok(LedgerGate::Replay(response))
            }
            RunStatus::Failed => {
                conn.execute(
                    "UPDATE tool_run
                     SET status = 'STARTED', error_code = NULL, result_json = NULL, updated_at = ?2
                     WHERE id = ?1",
                    params![id, ts],
                )?;
                Ok(LedgerGate::Fresh(id))
            }
            RunStatus::Started => Ok(LedgerGate::InFlight(id)),
        }
    }

    /// Record the terminal success payload. SUCCEEDED is final: replays of
    /// the same key return exactly this serialized response.
    pub fn finish_success(
        &self,
        run_id: i64,
        response: &BookingResponse,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(response)?;
        self.conn.lock().execute(
            "UPDATE tool_run
             SET status = 'SUCCEEDED', result_json = ?2, error_code = NULL, updated_at = ?3
             WHERE id = ?1",
            params![run_id, payload, now.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Record a classified failure. The row stays retryable: the next
    /// `get_or_start` for the key reopens it to STARTED.
    pub fn finish_failure(
        &self,
        run_id: i64,
        code: ErrorCode,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "UPDATE tool_run
             SET status = 'FAILED', error_code = ?2, result_json = NULL, updated_at = ?3
             WHERE id = ?1",
            params![run_id, code.as_str(), now.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Current status and error code for a run row (diagnostics and tests).
    pub fn run_status(&self, run_id: i64) -> Result<(RunStatus, Option<String>), StoreError> {
        let conn = self.conn.lock();
        let (status, error_code): (String, Option<String>) = conn.query_row(
            "SELECT status, error_code FROM tool_run WHERE id = ?1",
            params![run_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        Ok((RunStatus::from_db(&status), error_code))
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
