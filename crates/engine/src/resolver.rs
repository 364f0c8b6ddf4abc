// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tenant window-id resolution with a read-through cache
//!
//! The semantic `morning`/`afternoon` axis has to land on the Directory's
//! own allocation-window uuids before a create can be submitted. The mapping
//! is derived data: an in-process cache in front of the persisted
//! `allocation_window_map` row, refreshed from the Directory on miss or on
//! demand. Refresh is idempotent and last-writer-wins — concurrent refreshes
//! are tolerated, not prevented.

use arvo_adapters::windows::fetch_window_catalog;
use arvo_adapters::DirectoryAdapter;
use arvo_core::{TenantId, Window, WindowId};
use arvo_storage::{Store, StoreError, WindowMapRecord};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct WindowResolver {
    store: Arc<Store>,
    cache: Arc<Mutex<HashMap<TenantId, WindowMapRecord>>>,
}

impl WindowResolver {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store, cache: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Resolve a semantic window to the tenant's Directory window id.
    ///
    /// Cache, then store, then a Directory refresh; `Ok(None)` means the
    /// Directory itself has no classifiable window for this bucket.
    pub async fn resolve<D: DirectoryAdapter>(
        &self,
        tenant: &TenantId,
        directory: &D,
        window: Window,
        now: DateTime<Utc>,
    ) -> Result<Option<WindowId>, StoreError> {
        if let Some(record) = self.cache.lock().get(tenant) {
            if let Some(id) = record.id_for(window) {
                return Ok(Some(id.clone()));
            }
        }

        if let Some(record) = self.store.window_map(tenant)? {
            let id = record.id_for(window).cloned();
            self.cache.lock().insert(tenant.clone(), record);
            if id.is_some() {
                return Ok(id);
            }
        }

        let record = self.refresh(tenant, directory, now).await?;
        Ok(record.id_for(window).cloned())
    }

    /// Rebuild the mapping from the Directory's window catalog and persist
    /// it. First classified entry per bucket wins.
    pub async fn refresh<D: DirectoryAdapter>(
        &self,
        tenant: &TenantId,
        directory: &D,
        now: DateTime<Utc>,
    ) -> Result<WindowMapRecord, StoreError> {
        let catalog = match fetch_window_catalog(directory).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(%tenant, error = %e, "window catalog fetch failed");
                Vec::new()
            }
        };

        let mut record = WindowMapRecord::default();
        for entry in catalog {
            match entry.window {
                Some(Window::Morning) if record.morning.is_none() => {
                    record.morning = Some(entry.id);
                }
                Some(Window::Afternoon) if record.arvo.is_none() => {
                    record.arvo = Some(entry.id);
                }
                _ => {}
            }
        }

        self.store.put_window_map(tenant, &record, now)?;
        self.cache.lock().insert(tenant.clone(), record.clone());
        tracing::debug!(
            %tenant,
            morning = ?record.morning,
            arvo = ?record.arvo,
            "window map refreshed"
        );
        Ok(record)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
