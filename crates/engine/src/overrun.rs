// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The overrun / delay-cascade monitor
//!
//! One pass per tenant per invocation: detect allocations running past their
//! scheduled end beyond the grace period, cascade a delay notice to the next
//! job on the same technician's run, alert the dispatcher on major delays,
//! and send "30 minutes away" notices once the previous job completes. Every
//! notification is guarded by a claim row — the pass is safe to re-invoke
//! over already-processed state.

use crate::config::TenantConfig;
use crate::error::MonitorError;
use arvo_adapters::{
    allocations_for_date, contact_mobile_from_value, normalize_mobile, AllocationRecord,
    DirectoryAdapter, SmsSender,
};
use arvo_core::{Clock, ClockTime, JobId, TenantId};
use arvo_storage::{SmsType, Store};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Aggregate counters for one monitor pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorReport {
    /// Allocations past their scheduled end beyond grace this pass
    pub overruns: u32,
    pub average_delay_minutes: f64,
    /// Fraction of historical overrun states that got a delay notice out
    pub eta_accuracy: f64,
    pub notifications_sent: u32,
}

pub struct OverrunMonitor<D, S, C> {
    directory: D,
    sms: S,
    clock: C,
    store: Arc<Store>,
    config: TenantConfig,
}

impl<D, S, C> OverrunMonitor<D, S, C>
where
    D: DirectoryAdapter,
    S: SmsSender,
    C: Clock,
{
    pub fn new(directory: D, sms: S, clock: C, store: Arc<Store>, config: TenantConfig) -> Self {
        Self { directory, sms, clock, store, config }
    }

    /// One monitor pass over today's allocations for the tenant.
    pub async fn run(&self, tenant: &TenantId) -> Result<MonitorReport, MonitorError> {
        if !self.config.overrun_monitor_enabled {
            return Err(MonitorError::Disabled);
        }
        let now = self.clock.now_utc();
        let local = self.config.local_now(&self.clock);
        let today = local.date_naive();
        let local_time = local_clock_time(&local);
        let records = allocations_for_date(&self.directory, today).await;
        tracing::debug!(%tenant, %today, allocations = records.len(), "overrun pass starting");

        let mut overruns = 0u32;
        let mut total_delay = 0i64;
        let mut notifications = 0u32;

        for alloc in &records {
            if alloc.is_completed() {
                continue;
            }
            let Some(end) = alloc.end else { continue };
            if end >= local_time {
                continue;
            }
            let delay = end.minutes_until(local_time) as i64;
            if delay <= self.config.grace_minutes {
                continue;
            }

            tracing::info!(%tenant, allocation = %alloc.id, delay, "overrun detected");
            overruns += 1;
            total_delay += delay;
            self.store.record_overrun(tenant, &alloc.id, alloc.job.as_ref(), delay, now)?;

            if let Some(next) = next_for_staff(&records, alloc) {
                if let Some(next_job) = &next.job {
                    if self.store.claim_sms(&alloc.id, next_job, SmsType::DelaySent, now)? {
                        notifications += self
                            .send_delay_notice(tenant, alloc, next, next_job, delay)
                            .await?;
                    }
                }
            }

            if delay > self.config.major_delay_minutes {
                if let Some(dispatcher) = self.config.dispatcher_mobile.clone() {
                    notifications += self
                        .send_major_alert(tenant, alloc, &dispatcher, delay)
                        .await?;
                }
            }
        }

        for alloc in &records {
            if !alloc.is_completed() {
                continue;
            }
            let Some(next) = next_for_staff(&records, alloc) else { continue };
            let Some(next_job) = &next.job else { continue };
            let Some(start) = next.start else { continue };
            if start < local_time || local_time.minutes_until(start) > 30 {
                continue;
            }
            if !self.store.claim_sms(&alloc.id, next_job, SmsType::Eta30Min, now)? {
                continue;
            }
            match self.customer_mobile(next_job).await {
                None => {
                    self.store.release_sms(&alloc.id, next_job, SmsType::Eta30Min)?;
                }
                Some(mobile) => {
                    let message = "Your technician is about 30 minutes away.";
                    if let Err(e) =
                        self.sms.send_sms(tenant, &mobile, message, Some(next_job)).await
                    {
                        self.store.release_sms(&alloc.id, next_job, SmsType::Eta30Min)?;
                        return Err(e.into());
                    }
                    notifications += 1;
                    self.append_note(next_job, "30-minutes-away SMS sent").await;
                    self.store.mark_thirty_away_sent(&alloc.id, now)?;
                }
            }
        }

        let (states, delay_sent) = self.store.overrun_totals(tenant)?;
        let report = MonitorReport {
            overruns,
            average_delay_minutes: if overruns > 0 {
                total_delay as f64 / overruns as f64
            } else {
                0.0
            },
            eta_accuracy: if states > 0 { delay_sent as f64 / states as f64 } else { 1.0 },
            notifications_sent: notifications,
        };
        tracing::info!(
            %tenant,
            overruns = report.overruns,
            sent = report.notifications_sent,
            "overrun pass complete"
        );
        Ok(report)
    }

    /// Backdate the job's most recent allocation by `minutes` and run a
    /// pass, as if the technician were running that far behind.
    pub async fn simulate_overrun(
        &self,
        tenant: &TenantId,
        job: &JobId,
        minutes: u32,
    ) -> Result<MonitorReport, MonitorError> {
        if !self.config.overrun_monitor_enabled {
            return Err(MonitorError::Disabled);
        }
        let today = self.config.local_now(&self.clock).date_naive();
        let records = allocations_for_date(&self.directory, today).await;
        let target = records
            .iter()
            .filter(|r| r.job.as_ref() == Some(job))
            .max_by_key(|r| r.start);

        if let Some(target) = target {
            let start = target.start.map(|t| back_by(t, minutes));
            let end = target.end.map(|t| back_by(t, minutes));
            let body = json!({
                "start_time": start.map(|t| t.to_string()),
                "end_time": end.map(|t| t.to_string()),
            });
            self.directory
                .put(&format!("joballocation/{}.json", target.id.as_str()), &body)
                .await?;
            tracing::info!(%tenant, %job, minutes, allocation = %target.id, "allocation backdated for simulation");
        } else {
            tracing::warn!(%tenant, %job, "no allocation found to backdate");
        }
        self.run(tenant).await
    }

    /// Claimed delay notice to the next affected job. Returns how many
    /// notifications went out (0 or 1). A send failure releases the claim
    /// and propagates; an unusable contact releases and moves on.
    async fn send_delay_notice(
        &self,
        tenant: &TenantId,
        source: &AllocationRecord,
        next: &AllocationRecord,
        next_job: &JobId,
        delay: i64,
    ) -> Result<u32, MonitorError> {
        let Some(mobile) = self.customer_mobile(next_job).await else {
            tracing::warn!(%tenant, job = %next_job, "no usable mobile for delay notice");
            self.store.release_sms(&source.id, next_job, SmsType::DelaySent)?;
            return Ok(0);
        };
        // next_for_staff only returns records with a start time.
        let Some(start) = next.start else {
            self.store.release_sms(&source.id, next_job, SmsType::DelaySent)?;
            return Ok(0);
        };
        let eta = start.plus_minutes(delay.unsigned_abs() as u32);
        let message = format!(
            "We're running about {delay} minutes behind schedule. New ETA for your job: {eta}."
        );
        if let Err(e) = self.sms.send_sms(tenant, &mobile, &message, Some(next_job)).await {
            self.store.release_sms(&source.id, next_job, SmsType::DelaySent)?;
            return Err(e.into());
        }
        self.append_note(
            next_job,
            &format!("Delay SMS sent: new ETA {eta} after a {delay} minute overrun"),
        )
        .await;
        let now = self.clock.now_utc();
        self.store.mark_delay_sms_sent(&source.id, now)?;
        Ok(1)
    }

    /// Claimed dispatcher alert for a major delay. At most one per
    /// allocation, ever.
    async fn send_major_alert(
        &self,
        tenant: &TenantId,
        source: &AllocationRecord,
        dispatcher: &str,
        delay: i64,
    ) -> Result<u32, MonitorError> {
        let already_sent = self
            .store
            .overrun_state(&source.id)?
            .is_some_and(|s| s.major_alert_sent_at.is_some());
        if already_sent {
            return Ok(0);
        }
        let target = source.job.clone().unwrap_or_else(|| JobId::new("dispatcher"));
        let now = self.clock.now_utc();
        if !self.store.claim_sms(&source.id, &target, SmsType::MajorDelayAlert, now)? {
            return Ok(0);
        }
        let message =
            format!("Major delay: allocation {} is running {delay} minutes over.", source.id);
        if let Err(e) = self.sms.send_sms(tenant, dispatcher, &message, source.job.as_ref()).await
        {
            self.store.release_sms(&source.id, &target, SmsType::MajorDelayAlert)?;
            return Err(e.into());
        }
        self.store.mark_major_alert_sent(&source.id, now)?;
        Ok(1)
    }

    /// Customer mobile for a job, normalized; `None` for anything unusable.
    async fn customer_mobile(&self, job: &JobId) -> Option<String> {
        match self
            .directory
            .get(&format!("jobcontact.json?job_uuid={}", job.as_str()))
            .await
        {
            Ok(response) => {
                contact_mobile_from_value(&response.data, job).and_then(|m| normalize_mobile(&m))
            }
            Err(e) => {
                tracing::warn!(%job, error = %e, "job contact lookup failed");
                None
            }
        }
    }

    /// Best-effort audit note on the job record; failures are logged and
    /// swallowed.
    async fn append_note(&self, job: &JobId, note: &str) {
        let body = json!({ "related_record_uuid": job.as_str(), "note": note });
        if let Err(e) = self.directory.post("note.json", &body).await {
            tracing::warn!(%job, error = %e, "audit note append failed");
        }
    }
}

/// The next allocation on the same technician's run: same staff, later
/// start, not completed. Records without staff or start cannot participate.
fn next_for_staff<'a>(
    records: &'a [AllocationRecord],
    source: &AllocationRecord,
) -> Option<&'a AllocationRecord> {
    let staff = source.staff.as_ref()?;
    let source_start = source.start?;
    records
        .iter()
        .filter(|r| r.id != source.id && !r.is_completed())
        .filter(|r| r.staff.as_ref() == Some(staff))
        .filter_map(|r| r.start.map(|s| (s, r)))
        .filter(|(s, _)| *s > source_start)
        .min_by_key(|(s, _)| *s)
        .map(|(_, r)| r)
}

fn local_clock_time(local: &chrono::DateTime<chrono::FixedOffset>) -> ClockTime {
    use chrono::Timelike;
    ClockTime::new(local.hour(), local.minute())
}

fn back_by(t: ClockTime, minutes: u32) -> ClockTime {
    ClockTime::from_minutes(t.total_minutes().saturating_sub(minutes))
}

#[cfg(test)]
#[path = "overrun_tests.rs"]
mod tests;
