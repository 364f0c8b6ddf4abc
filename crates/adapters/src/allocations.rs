// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allocation list fetch with query-encoding fallbacks
//!
//! Directory deployments disagree on how list filters are spelled. The fetch
//! tries each known encoding in order and takes the first non-error answer,
//! filtering client-side regardless so a server that ignored the filter
//! still yields correct results. Exhaustion degrades to an empty list — the
//! callers treat "no allocations visible" as schedulable emptiness.

use crate::directory::DirectoryAdapter;
use crate::records::{allocations_from_value, AllocationRecord};
use chrono::NaiveDate;

fn query_encodings(date: NaiveDate) -> [String; 3] {
    [
        format!("joballocation.json?%24filter=allocation_date%20eq%20'{date}'"),
        format!("joballocation.json?allocation_date={date}"),
        "joballocation.json".to_string(),
    ]
}

/// All allocations for a business-local date.
pub async fn allocations_for_date<D: DirectoryAdapter>(
    directory: &D,
    date: NaiveDate,
) -> Vec<AllocationRecord> {
    for path in query_encodings(date) {
        match directory.get(&path).await {
            Ok(response) => {
                let records: Vec<AllocationRecord> = allocations_from_value(&response.data)
                    .into_iter()
                    .filter(|r| r.date == Some(date))
                    .collect();
                return records;
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "allocation list query failed, trying next encoding");
            }
        }
    }
    tracing::warn!(%date, "all allocation list encodings failed");
    Vec::new()
}

#[cfg(test)]
#[path = "allocations_tests.rs"]
mod tests;
