// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection handling and schema bootstrap

use crate::error::StoreError;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// All persisted booking-engine state behind one SQLite connection.
///
/// The connection sits behind a mutex so a `Store` can be shared via `Arc`
/// from async code; every operation is short, and the single writer matches
/// SQLite's own locking model.
pub struct Store {
    pub(crate) conn: Mutex<Connection>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tool_run (
    id           INTEGER PRIMARY KEY,
    tenant_id    TEXT NOT NULL,
    endpoint     TEXT NOT NULL,
    call_id      TEXT NOT NULL,
    status       TEXT NOT NULL,
    result_json  TEXT,
    error_code   TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    UNIQUE (tenant_id, endpoint, call_id)
);

CREATE TABLE IF NOT EXISTS window_capacity (
    tenant_id    TEXT NOT NULL,
    date         TEXT NOT NULL,
    window       TEXT NOT NULL,
    max_capacity INTEGER NOT NULL,
    booked_count INTEGER NOT NULL DEFAULT 0,
    UNIQUE (tenant_id, date, window)
);

CREATE TABLE IF NOT EXISTS job_window_booking (
    job_id        TEXT PRIMARY KEY,
    tenant_id     TEXT NOT NULL,
    date          TEXT NOT NULL,
    window        TEXT NOT NULL,
    allocation_id TEXT,
    status        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS allocation_window_map (
    tenant_id         TEXT PRIMARY KEY,
    morning_window_id TEXT,
    arvo_window_id    TEXT,
    refreshed_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS overrun_monitor_state (
    allocation_id     TEXT PRIMARY KEY,
    tenant_id         TEXT NOT NULL,
    job_id            TEXT,
    delay_minutes     INTEGER NOT NULL DEFAULT 0,
    detected_at       TEXT,
    major_alert_sent_at TEXT,
    thirty_away_sent_at TEXT,
    delay_sms_sent_at TEXT
);

CREATE TABLE IF NOT EXISTS overrun_sms_event (
    source_allocation_id TEXT NOT NULL,
    target_job_id        TEXT NOT NULL,
    sms_type             TEXT NOT NULL,
    sent_at              TEXT NOT NULL,
    UNIQUE (source_allocation_id, target_job_id, sms_type)
);
";

impl Store {
    /// Open (creating if needed) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    /// In-memory store for tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        // journal_mode returns the resulting mode as a row, so query it.
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
