// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory client trait and HTTP implementation
//!
//! The Directory is the external field-service system of record. Four verbs
//! cover everything the engine needs; resource paths are relative
//! (`staff.json`, `joballocation/<uuid>.json`, ...).

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors from Directory calls
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The Directory answered with a non-2xx status
    #[error("directory api error: status {status}")]
    Api { status: u16, body: String },
    /// The request never completed (connect/timeout/TLS)
    #[error("directory transport error: {0}")]
    Transport(String),
}

impl DirectoryError {
    /// Upstream HTTP status, when there was a response at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    /// Upstream body for diagnostics
    pub fn body(&self) -> &str {
        match self {
            Self::Api { body, .. } => body,
            Self::Transport(msg) => msg,
        }
    }
}

/// One Directory answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryResponse {
    /// Created record uuid, reported out-of-band on create calls
    pub record_id: Option<String>,
    pub data: Value,
}

/// Adapter for the external Directory
#[async_trait]
pub trait DirectoryAdapter: Clone + Send + Sync + 'static {
    async fn get(&self, path: &str) -> Result<DirectoryResponse, DirectoryError>;
    async fn post(&self, path: &str, body: &Value) -> Result<DirectoryResponse, DirectoryError>;
    async fn put(&self, path: &str, body: &Value) -> Result<DirectoryResponse, DirectoryError>;
    async fn delete(&self, path: &str) -> Result<DirectoryResponse, DirectoryError>;
}

/// Production Directory client over HTTPS.
///
/// One instance per tenant: the bearer token scopes every call. Token
/// acquisition and refresh live with the credential collaborator, not here.
#[derive(Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    base_url: Arc<str>,
    token: Arc<str>,
}

impl HttpDirectory {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().into(),
            token: token.into().into(),
        }
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<DirectoryResponse, DirectoryError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let mut builder = self.client.request(method, &url).bearer_auth(&self.token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let record_id = response
            .headers()
            .get("x-record-uuid")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response
            .text()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(DirectoryError::Api { status, body: text });
        }
        let data = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };
        Ok(DirectoryResponse { record_id, data })
    }
}

#[async_trait]
impl DirectoryAdapter for HttpDirectory {
    async fn get(&self, path: &str) -> Result<DirectoryResponse, DirectoryError> {
        self.request(reqwest::Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<DirectoryResponse, DirectoryError> {
        self.request(reqwest::Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<DirectoryResponse, DirectoryError> {
        self.request(reqwest::Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<DirectoryResponse, DirectoryError> {
        self.request(reqwest::Method::DELETE, path, None).await
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod fake {
    use super::{DirectoryAdapter, DirectoryError, DirectoryResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Recorded Directory call
    #[derive(Debug, Clone)]
    pub struct DirectoryCall {
        pub method: &'static str,
        pub path: String,
        pub body: Option<Value>,
    }

    struct Rule {
        method: &'static str,
        path_prefix: String,
        /// Consumed front-to-back; the final response is sticky.
        responses: VecDeque<Result<DirectoryResponse, DirectoryError>>,
    }

    #[derive(Default)]
    struct FakeState {
        calls: Vec<DirectoryCall>,
        rules: Vec<Rule>,
        /// uuid → record, acting as the Directory's allocation table
        allocations: Vec<Value>,
        next_id: u32,
    }

    /// In-memory Directory for tests.
    ///
    /// Behaves like a tiny allocation table: POSTs to `joballocation` create
    /// records, GET/PUT/DELETE address them, list GETs return them all.
    /// Anything else answers an empty list unless a stub rule matches.
    /// Stub rules (matched by method + path prefix) always take precedence.
    #[derive(Clone, Default)]
    pub struct FakeDirectory {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakeDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Stub a sticky response for all matching calls.
        pub fn stub(
            &self,
            method: &'static str,
            path_prefix: &str,
            response: Result<DirectoryResponse, DirectoryError>,
        ) {
            let mut state = self.inner.lock();
            state.rules.push(Rule {
                method,
                path_prefix: path_prefix.to_string(),
                responses: VecDeque::from([response]),
            });
        }

        /// Stub a one-shot response; later matching calls fall through to the
        /// next queued response (the last queued entry is sticky).
        pub fn stub_push(
            &self,
            method: &'static str,
            path_prefix: &str,
            response: Result<DirectoryResponse, DirectoryError>,
        ) {
            let mut state = self.inner.lock();
            if let Some(rule) = state
                .rules
                .iter_mut()
                .find(|r| r.method == method && r.path_prefix == path_prefix)
            {
                rule.responses.push_back(response);
            } else {
                drop(state);
                self.stub(method, path_prefix, response);
            }
        }

        /// Stub a sticky GET returning this JSON payload.
        pub fn stub_get_json(&self, path_prefix: &str, data: Value) {
            self.stub("GET", path_prefix, Ok(DirectoryResponse { record_id: None, data }));
        }

        /// Stub an API failure.
        pub fn stub_failure(&self, method: &'static str, path_prefix: &str, status: u16, body: &str) {
            self.stub(method, path_prefix, Err(DirectoryError::Api { status, body: body.to_string() }));
        }

        /// Seed an allocation record as if it had been created earlier.
        pub fn seed_allocation(&self, record: Value) {
            self.inner.lock().allocations.push(record);
        }

        /// All recorded calls
        pub fn calls(&self) -> Vec<DirectoryCall> {
            self.inner.lock().calls.clone()
        }

        /// Recorded calls for one verb
        pub fn calls_for(&self, method: &'static str) -> Vec<DirectoryCall> {
            self.inner.lock().calls.iter().filter(|c| c.method == method).cloned().collect()
        }

        /// Current allocation records
        pub fn allocations(&self) -> Vec<Value> {
            self.inner.lock().allocations.clone()
        }

        fn respond(
            &self,
            method: &'static str,
            path: &str,
            body: Option<&Value>,
        ) -> Result<DirectoryResponse, DirectoryError> {
            let mut state = self.inner.lock();
            state.calls.push(DirectoryCall {
                method,
                path: path.to_string(),
                body: body.cloned(),
            });

            if let Some(rule) = state
                .rules
                .iter_mut()
                .find(|r| r.method == method && path.starts_with(r.path_prefix.as_str()))
            {
                if rule.responses.len() > 1 {
                    if let Some(response) = rule.responses.pop_front() {
                        return response;
                    }
                }
                if let Some(response) = rule.responses.front() {
                    return response.clone();
                }
            }

            match method {
                "POST" if path.starts_with("joballocation") => {
                    state.next_id += 1;
                    let uuid = format!("alloc-{}", state.next_id);
                    let mut record = body.cloned().unwrap_or_else(|| json!({}));
                    if let Some(map) = record.as_object_mut() {
                        map.insert("uuid".into(), json!(uuid));
                    }
                    state.allocations.push(record);
                    Ok(DirectoryResponse { record_id: Some(uuid), data: Value::Null })
                }
                "GET" if path.starts_with("joballocation/") => {
                    let uuid = path.trim_start_matches("joballocation/").trim_end_matches(".json");
                    match state.allocations.iter().find(|r| r["uuid"] == uuid) {
                        Some(record) => Ok(DirectoryResponse {
                            record_id: None,
                            data: record.clone(),
                        }),
                        None => Err(DirectoryError::Api { status: 404, body: "not found".into() }),
                    }
                }
                "GET" if path.starts_with("joballocation") => Ok(DirectoryResponse {
                    record_id: None,
                    data: Value::Array(state.allocations.clone()),
                }),
                "PUT" if path.starts_with("joballocation/") => {
                    let uuid = path
                        .trim_start_matches("joballocation/")
                        .trim_end_matches(".json")
                        .to_string();
                    let update = body.cloned();
                    match state.allocations.iter_mut().find(|r| r["uuid"] == uuid.as_str()) {
                        Some(record) => {
                            if let (Some(target), Some(Value::Object(fields))) =
                                (record.as_object_mut(), update)
                            {
                                for (k, v) in fields {
                                    target.insert(k, v);
                                }
                            }
                            Ok(DirectoryResponse::default())
                        }
                        None => Err(DirectoryError::Api { status: 404, body: "not found".into() }),
                    }
                }
                "DELETE" if path.starts_with("joballocation/") => {
                    let uuid = path.trim_start_matches("joballocation/").trim_end_matches(".json");
                    state.allocations.retain(|r| r["uuid"] != uuid);
                    Ok(DirectoryResponse::default())
                }
                "GET" => Ok(DirectoryResponse { record_id: None, data: json!([]) }),
                _ => Ok(DirectoryResponse::default()),
            }
        }
    }

    #[async_trait]
    impl DirectoryAdapter for FakeDirectory {
        async fn get(&self, path: &str) -> Result<DirectoryResponse, DirectoryError> {
            self.respond("GET", path, None)
        }

        async fn post(&self, path: &str, body: &Value) -> Result<DirectoryResponse, DirectoryError> {
            self.respond("POST", path, Some(body))
        }

        async fn put(&self, path: &str, body: &Value) -> Result<DirectoryResponse, DirectoryError> {
            self.respond("PUT", path, Some(body))
        }

        async fn delete(&self, path: &str) -> Result<DirectoryResponse, DirectoryError> {
            self.respond("DELETE", path, None)
        }
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
