// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted tenant → Directory allocation-window mapping
//!
//! This table is a derived cache over the Directory, so writes are
//! last-writer-wins and concurrent refreshes are harmless.

use crate::error::StoreError;
use crate::store::Store;
use arvo_core::{TenantId, Window, WindowId};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

/// Resolved window ids for one tenant
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowMapRecord {
    pub morning: Option<WindowId>,
    pub arvo: Option<WindowId>,
}

impl WindowMapRecord {
    pub fn id_for(&self, window: Window) -> Option<&WindowId> {
        match window {
            Window::Morning => self.morning.as_ref(),
            Window::Afternoon => self.arvo.as_ref(),
        }
    }
}

impl Store {
    pub fn window_map(&self, tenant: &TenantId) -> Result<Option<WindowMapRecord>, StoreError> {
        let conn = self.conn.lock();
        let row: Option<(Option<String>, Option<String>)> = conn
            .query_row(
                "SELECT morning_window_id, arvo_window_id FROM allocation_window_map
                 WHERE tenant_id = ?1",
                params![tenant.as_str()],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        Ok(row.map(|(morning, arvo)| WindowMapRecord {
            morning: morning.map(WindowId::new),
            arvo: arvo.map(WindowId::new),
        }))
    }

    pub fn put_window_map(
        &self,
        tenant: &TenantId,
        map: &WindowMapRecord,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT INTO allocation_window_map
                 (tenant_id, morning_window_id, arvo_window_id, refreshed_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (tenant_id) DO UPDATE SET
                 morning_window_id = excluded.morning_window_id,
                 arvo_window_id = excluded.arvo_window_id,
                 refreshed_at = excluded.refreshed_at",
            params![
                tenant.as_str(),
                map.morning.as_ref().map(|w| w.as_str()),
                map.arvo.as_ref().map(|w| w.as_str()),
                now.to_rfc3339()
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "window_map_tests.rs"]
mod tests;
