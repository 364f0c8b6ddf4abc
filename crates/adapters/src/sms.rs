// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SMS gateway trait and HTTP implementation

use arvo_core::{JobId, TenantId};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// A failed send, carrying the gateway's answer verbatim.
#[derive(Debug, Clone, Error)]
#[error("sms gateway error: status {status}")]
pub struct SmsError {
    pub status: u16,
    pub body: String,
}

/// Adapter for the outbound SMS gateway
#[async_trait]
pub trait SmsSender: Clone + Send + Sync + 'static {
    async fn send_sms(
        &self,
        tenant: &TenantId,
        to_mobile: &str,
        message: &str,
        related_job: Option<&JobId>,
    ) -> Result<(), SmsError>;
}

/// Production gateway client. One POST per message, no batching.
#[derive(Clone)]
pub struct HttpSmsSender {
    client: reqwest::Client,
    endpoint: Arc<str>,
    token: Arc<str>,
}

impl HttpSmsSender {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().into(),
            token: token.into().into(),
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send_sms(
        &self,
        tenant: &TenantId,
        to_mobile: &str,
        message: &str,
        related_job: Option<&JobId>,
    ) -> Result<(), SmsError> {
        let payload = json!({
            "tenant": tenant.as_str(),
            "to": to_mobile,
            "message": message,
            "job_uuid": related_job.map(JobId::as_str),
        });
        let response = self
            .client
            .post(self.endpoint.as_ref())
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SmsError { status: 0, body: e.to_string() })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError { status, body });
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod fake {
    use super::{SmsError, SmsSender};
    use arvo_core::{JobId, TenantId};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded outbound message
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SmsCall {
        pub to: String,
        pub message: String,
        pub job: Option<JobId>,
    }

    #[derive(Default)]
    struct FakeState {
        calls: Vec<SmsCall>,
        fail_next: u32,
    }

    /// In-memory gateway for tests. Records every send; `fail_next` sends
    /// error with status 503 before succeeding again.
    #[derive(Clone, Default)]
    pub struct FakeSmsSender {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakeSmsSender {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the next `n` sends fail.
        pub fn fail_next(&self, n: u32) {
            self.inner.lock().fail_next = n;
        }

        pub fn calls(&self) -> Vec<SmsCall> {
            self.inner.lock().calls.clone()
        }

        pub fn sent_count(&self) -> usize {
            self.inner.lock().calls.len()
        }
    }

    #[async_trait]
    impl SmsSender for FakeSmsSender {
        async fn send_sms(
            &self,
            _tenant: &TenantId,
            to_mobile: &str,
            message: &str,
            related_job: Option<&JobId>,
        ) -> Result<(), SmsError> {
            let mut state = self.inner.lock();
            if state.fail_next > 0 {
                state.fail_next -= 1;
                return Err(SmsError { status: 503, body: "gateway busy".into() });
            }
            state.calls.push(SmsCall {
                to: to_mobile.to_string(),
                message: message.to_string(),
                job: related_job.cloned(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "sms_tests.rs"]
mod tests;
