// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The booking orchestrator: the allocation commit protocol
//!
//! One request runs a fixed sequence — ledger gate, capacity pre-check,
//! past-window check, window resolution, staff/slot selection, best-effort
//! queue lookup, external create under the retry ladder, independent
//! verification, the legacy transactional capacity commit with its
//! compensating delete, and the optional confirmation SMS. Every failure is
//! classified into the [`ErrorCode`] taxonomy and recorded in the ledger
//! before it is returned; nothing crosses this boundary unclassified.

use crate::config::TenantConfig;
use crate::error::BookingError;
use crate::ladder::CreateAttempt;
use crate::resolver::WindowResolver;
use arvo_adapters::{
    allocations_for_date, allocations_from_value, booked_spans, first_active_queue,
    job_queue_from_value, normalize_mobile, staff_from_value, DirectoryAdapter, DirectoryError,
    SmsSender,
};
use arvo_core::{
    debug_ref, plan_slot, AllocationId, BookingFailure, BookingRequest, BookingResponse, Clock,
    ClockTime, ErrorCode, JobId, QueueId, SlotRequest, SmsPayload, StaffId, TenantId, Window,
    WindowId,
};
use arvo_storage::{LedgerGate, ReserveOutcome, Store, StoreError};
use chrono::{NaiveDate, Timelike};
use serde_json::{json, Value};
use std::sync::Arc;

/// Ledger endpoint name for booking requests
pub const BOOK_ENDPOINT: &str = "book_job";

/// Internal short-circuit: a classified business failure, or an
/// infrastructure failure that must surface as [`BookingError`].
enum Step {
    Fail(BookingFailure),
    Store(StoreError),
}

impl From<BookingFailure> for Step {
    fn from(failure: BookingFailure) -> Self {
        Self::Fail(failure)
    }
}

impl From<StoreError> for Step {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}

pub struct Orchestrator<D, S, C> {
    directory: D,
    sms: S,
    clock: C,
    store: Arc<Store>,
    resolver: WindowResolver,
    config: TenantConfig,
}

impl<D, S, C> Orchestrator<D, S, C>
where
    D: DirectoryAdapter,
    S: SmsSender,
    C: Clock,
{
    pub fn new(directory: D, sms: S, clock: C, store: Arc<Store>, config: TenantConfig) -> Self {
        let resolver = WindowResolver::new(store.clone());
        Self { directory, sms, clock, store, resolver, config }
    }

    /// Handle one booking request end to end.
    ///
    /// Replays of a succeeded idempotency key return the stored response
    /// verbatim with no side effects. Every other path finishes the ledger
    /// row before returning.
    pub async fn book(&self, request: &BookingRequest) -> Result<BookingResponse, BookingError> {
        let tenant = &request.tenant_id;
        let now = self.clock.now_utc();
        let run_id = match self.store.get_or_start(tenant, BOOK_ENDPOINT, &request.call_id, now)? {
            LedgerGate::Replay(stored) => {
                tracing::info!(%tenant, call_id = %request.call_id, "replaying stored booking result");
                return Ok(stored);
            }
            LedgerGate::Fresh(id) => id,
            LedgerGate::InFlight(id) => {
                // Documented race: uniqueness guards the row, not the logic.
                tracing::warn!(%tenant, call_id = %request.call_id, "idempotency key already in flight, proceeding");
                id
            }
        };

        match self.attempt(request).await {
            Ok(response) => {
                self.store.finish_success(run_id, &response, self.clock.now_utc())?;
                tracing::info!(%tenant, job = %request.job_id, "booking committed");
                Ok(response)
            }
            Err(Step::Fail(mut failure)) => {
                if failure.debug_ref.is_none() {
                    failure.debug_ref = Some(if request.request_id.is_empty() {
                        debug_ref()
                    } else {
                        request.request_id.clone()
                    });
                }
                tracing::warn!(
                    %tenant,
                    job = %request.job_id,
                    code = failure.error_code.as_str(),
                    "booking failed"
                );
                self.store.finish_failure(run_id, failure.error_code, self.clock.now_utc())?;
                Ok(BookingResponse::failure(failure))
            }
            Err(Step::Store(e)) => Err(e.into()),
        }
    }

    async fn attempt(&self, request: &BookingRequest) -> Result<BookingResponse, Step> {
        if request.call_id.trim().is_empty() || request.job_id.is_empty() {
            return Err(BookingFailure::new(
                ErrorCode::ValidationError,
                "call_id and job_id are required",
            )
            .into());
        }
        let tenant = &request.tenant_id;

        if self.config.use_legacy_capacity {
            self.store.ensure_window_capacity(
                tenant,
                request.date,
                request.window,
                self.config.default_window_capacity,
            )?;
            let remaining = self
                .store
                .window_remaining(
                    tenant,
                    request.date,
                    request.window,
                    self.config.emergency_reserve,
                )?
                .unwrap_or(0);
            if remaining <= 0 {
                return Err(no_capacity(request.window, request.date).into());
            }
        }

        let local = self.config.local_now(&self.clock);
        let local_today = local.date_naive();
        let local_time = ClockTime::new(local.hour(), local.minute());
        if window_is_past(
            request.date,
            request.window,
            local_today,
            local_time,
            self.config.afternoon_cutoff,
        ) {
            return Err(BookingFailure::new(
                ErrorCode::PastWindow,
                format!("the {} window on {} has already passed", request.window, request.date),
            )
            .into());
        }

        let mut window_id = match &request.allocation_window_id {
            Some(id) => id.clone(),
            None => {
                match self
                    .resolver
                    .resolve(tenant, &self.directory, request.window, self.clock.now_utc())
                    .await?
                {
                    Some(id) => id,
                    None => {
                        return Err(BookingFailure::new(
                            ErrorCode::MissingAllocationWindow,
                            format!("no Directory window is mapped for {}", request.window),
                        )
                        .into());
                    }
                }
            }
        };

        let (staff_id, slot_start, slot_end) = if self.config.use_capacity_engine {
            let staff_list = self
                .directory
                .get("staff.json")
                .await
                .map_err(|e| directory_failure(e, "staff fetch"))?;
            let staff = staff_from_value(&staff_list.data);
            if staff.is_empty() {
                return Err(BookingFailure::new(
                    ErrorCode::NoCapacity,
                    "no active staff available",
                )
                .into());
            }
            let allocations = allocations_for_date(&self.directory, request.date).await;
            let spans = booked_spans(&allocations, request.window, Some(&window_id));
            let decision = plan_slot(
                &staff,
                &spans,
                &SlotRequest {
                    window: request.window,
                    duration_minutes: self.config.default_job_minutes,
                    max_jobs_per_window: self.config.max_jobs_per_window,
                    buffer_ratio: self.config.buffer_ratio,
                },
            );
            match decision.choice {
                Some(choice) => {
                    tracing::debug!(
                        %tenant,
                        staff = %choice.staff,
                        start = %choice.start,
                        effective = decision.effective_minutes,
                        "slot selected"
                    );
                    (choice.staff, choice.start, choice.end)
                }
                None => return Err(no_capacity(request.window, request.date).into()),
            }
        } else {
            let Some(staff) = self.config.default_staff_id.clone() else {
                return Err(BookingFailure::new(
                    ErrorCode::ValidationError,
                    "no default staff configured for this tenant",
                )
                .into());
            };
            let (start, end) = request.window.bounds();
            (staff, start, end)
        };

        let queue = self.resolve_queue(&request.job_id).await;

        let mut attempt = CreateAttempt::Full;
        let allocation_id = loop {
            let include_status =
                attempt.includes_scheduling_status(self.config.use_capacity_engine);
            if attempt == CreateAttempt::AfterWindowRefresh {
                let record = self
                    .resolver
                    .refresh(tenant, &self.directory, self.clock.now_utc())
                    .await?;
                if let Some(id) = record.id_for(request.window) {
                    window_id = id.clone();
                }
            }
            let body = create_body(
                request,
                &staff_id,
                &window_id,
                slot_start,
                slot_end,
                queue.as_ref(),
                include_status,
            );
            match self.directory.post("joballocation.json", &body).await {
                Ok(response) => match response.record_id {
                    Some(id) => break AllocationId::new(id),
                    None => {
                        return Err(BookingFailure::new(
                            ErrorCode::AllocationMissingUuid,
                            "Directory created the allocation without reporting its uuid",
                        )
                        .into());
                    }
                },
                Err(e) => match attempt.next(e.status(), include_status) {
                    Some(next) => {
                        tracing::warn!(
                            %tenant,
                            job = %request.job_id,
                            status = ?e.status(),
                            ?next,
                            "allocation create rejected, retrying"
                        );
                        attempt = next;
                    }
                    None => return Err(directory_failure(e, "allocation create").into()),
                },
            }
        };

        if !self.verify_allocation(&request.job_id, &allocation_id).await {
            return Err(BookingFailure::new(
                ErrorCode::AllocationVerifyFailed,
                "created allocation is not independently visible in the Directory",
            )
            .into());
        }

        if self.config.use_legacy_capacity {
            self.commit_local_capacity(request, &allocation_id).await?;
        }

        let sms_sent = match &request.sms {
            None => None,
            Some(payload) => Some(self.send_confirmation(tenant, payload, &request.job_id).await),
        };

        let label = slot_label(request.date, request.window, local_today);
        Ok(BookingResponse::success(allocation_id, request.date, request.window, label, sms_sent))
    }

    /// The saga's local phase: re-check capacity and reserve inside one
    /// transaction. On conflict the external allocation created moments ago
    /// is deleted again — the defined rollback for a lost race — and the
    /// booking fails `NO_CAPACITY`.
    async fn commit_local_capacity(
        &self,
        request: &BookingRequest,
        allocation_id: &AllocationId,
    ) -> Result<(), Step> {
        let outcome = self.store.reserve_slot(
            &request.tenant_id,
            request.date,
            request.window,
            self.config.emergency_reserve,
            &request.job_id,
            allocation_id,
        )?;
        match outcome {
            ReserveOutcome::Reserved => Ok(()),
            ReserveOutcome::Conflict => {
                tracing::warn!(
                    tenant = %request.tenant_id,
                    allocation = %allocation_id,
                    "capacity conflict after external create, compensating"
                );
                if let Err(e) = self
                    .directory
                    .delete(&format!("joballocation/{}.json", allocation_id.as_str()))
                    .await
                {
                    tracing::error!(
                        allocation = %allocation_id,
                        error = %e,
                        "compensating delete failed, allocation may be orphaned"
                    );
                }
                Err(no_capacity(request.window, request.date).into())
            }
        }
    }

    /// Queue id off the job record, else the first active queue. Best
    /// effort: any Directory failure here resolves to no queue.
    async fn resolve_queue(&self, job: &JobId) -> Option<QueueId> {
        match self.directory.get(&format!("job/{}.json", job.as_str())).await {
            Ok(response) => {
                if let Some(queue) = job_queue_from_value(&response.data) {
                    return Some(QueueId::new(queue));
                }
            }
            Err(e) => {
                tracing::debug!(%job, error = %e, "job record fetch failed during queue resolution");
            }
        }
        match self.directory.get("queue.json").await {
            Ok(response) => first_active_queue(&response.data).map(QueueId::new),
            Err(e) => {
                tracing::debug!(error = %e, "queue list fetch failed during queue resolution");
                None
            }
        }
    }

    /// The create call alone is not trusted: the allocation must show up in
    /// a list filtered by job id AND in a direct fetch by its uuid.
    async fn verify_allocation(&self, job: &JobId, allocation: &AllocationId) -> bool {
        let listed = match self
            .directory
            .get(&format!("joballocation.json?job_uuid={}", job.as_str()))
            .await
        {
            Ok(response) => {
                allocations_from_value(&response.data).iter().any(|r| r.id == *allocation)
            }
            Err(e) => {
                tracing::warn!(%allocation, error = %e, "allocation list verification failed");
                false
            }
        };
        if !listed {
            return false;
        }
        match self
            .directory
            .get(&format!("joballocation/{}.json", allocation.as_str()))
            .await
        {
            Ok(response) => !response.data.is_null(),
            Err(e) => {
                tracing::warn!(%allocation, error = %e, "allocation direct-fetch verification failed");
                false
            }
        }
    }

    /// Send the booking confirmation. The booking stands either way; the
    /// outcome only shapes the `sms_sent` flag.
    async fn send_confirmation(
        &self,
        tenant: &TenantId,
        payload: &SmsPayload,
        job: &JobId,
    ) -> bool {
        let Some(to) = normalize_mobile(&payload.to_mobile) else {
            tracing::warn!(%tenant, %job, "confirmation mobile did not normalize, skipping send");
            return false;
        };
        match self.sms.send_sms(tenant, &to, &payload.message, Some(job)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%tenant, %job, status = e.status, "confirmation sms failed; booking stands");
                false
            }
        }
    }
}

/// Past-window rules: any earlier date is past; today's morning closes at
/// local noon; today's afternoon closes at the tenant's cutoff. Future dates
/// are never past.
fn window_is_past(
    date: NaiveDate,
    window: Window,
    local_today: NaiveDate,
    local_time: ClockTime,
    afternoon_cutoff: ClockTime,
) -> bool {
    if date < local_today {
        return true;
    }
    if date > local_today {
        return false;
    }
    match window {
        Window::Morning => local_time.hour() >= 12,
        Window::Afternoon => local_time >= afternoon_cutoff,
    }
}

/// Customer-facing slot label, e.g. "Today morning (8–12pm)".
fn slot_label(date: NaiveDate, window: Window, local_today: NaiveDate) -> String {
    if date == local_today {
        format!("Today {}", window.label_fragment())
    } else {
        format!("{} {}", date.format("%A"), window.label_fragment())
    }
}

fn no_capacity(window: Window, date: NaiveDate) -> BookingFailure {
    BookingFailure::new(
        ErrorCode::NoCapacity,
        format!("no {window} capacity left on {date}"),
    )
}

fn create_body(
    request: &BookingRequest,
    staff: &StaffId,
    window_id: &WindowId,
    start: ClockTime,
    end: ClockTime,
    queue: Option<&QueueId>,
    include_status: bool,
) -> Value {
    let mut body = json!({
        "job_uuid": request.job_id.as_str(),
        "staff_uuid": staff.as_str(),
        "allocation_date": request.date.to_string(),
        "allocation_window_uuid": window_id.as_str(),
        "start_time": start.to_string(),
        "end_time": end.to_string(),
    });
    if let Some(map) = body.as_object_mut() {
        if let Some(queue) = queue {
            map.insert("queue_uuid".into(), json!(queue.as_str()));
        }
        if include_status {
            map.insert("scheduling_status".into(), json!("scheduled"));
        }
    }
    body
}

/// Classify a Directory failure per the status table, keeping the upstream
/// status and body as diagnostics.
fn directory_failure(error: DirectoryError, context: &str) -> BookingFailure {
    match error {
        DirectoryError::Api { status, body } => BookingFailure::new(
            ErrorCode::from_directory_status(status),
            format!("{context} rejected by the Directory"),
        )
        .with_external(status, body),
        DirectoryError::Transport(msg) => BookingFailure::new(
            ErrorCode::Servicem8AllocFailed,
            format!("{context} failed in transport: {msg}"),
        ),
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
